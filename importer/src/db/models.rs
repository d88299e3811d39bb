use chrono::NaiveDate;
use diesel::prelude::*;
use serde::Deserialize;

/// League as found in a scraped JSON file
#[derive(Debug, Default, Deserialize)]
pub struct LeagueRecord {
    pub name: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub website: Option<String>,
    pub fees: Option<i32>,
    pub season_start: Option<NaiveDate>,
    pub season_end: Option<NaiveDate>,
    pub divisions: Option<Vec<String>>,
    pub nights: Option<Vec<String>>,
    pub formats: Option<Vec<String>>,
    pub contact_type: Option<String>,
    pub comp_levels: Option<Vec<String>>,
    pub signup_url: Option<String>,
    pub about: Option<String>,
    pub contact_name: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
}

/// Tournament or clinic as found in a scraped JSON file
#[derive(Debug, Default, Deserialize)]
pub struct EventRecord {
    pub name: Option<String>,
    pub kind: Option<String>,
    pub state: Option<String>,
    pub location: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub fee: Option<i32>,
    pub divisions: Option<Vec<String>>,
    pub formats: Option<Vec<String>>,
    pub contact_type: Option<String>,
    pub comp_levels: Option<Vec<String>>,
    pub website: Option<String>,
    pub signup_url: Option<String>,
    pub about: Option<String>,
    pub contact_name: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TeamRecord {
    pub name: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub gender: Option<String>,
    pub age_groups: Option<Vec<String>>,
    pub comp_levels: Option<Vec<String>>,
    pub formats: Option<Vec<String>>,
    pub contact_type: Option<String>,
    pub about: Option<String>,
    pub accomplishments: Option<String>,
    pub website: Option<String>,
    pub contact_name: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
}

#[derive(Insertable, Debug, Clone, PartialEq)]
#[diesel(table_name = crate::schema::cities)]
pub struct NewCity {
    pub name: String,
    pub state: String,
    pub slug: String,
}

#[derive(Insertable, Debug, Clone, PartialEq)]
#[diesel(table_name = crate::schema::leagues)]
pub struct NewLeague {
    pub name: String,
    pub slug: Option<String>,
    pub city_id: Option<i32>,
    pub website: Option<String>,
    pub fees: Option<i32>,
    pub season_start: Option<NaiveDate>,
    pub season_end: Option<NaiveDate>,
    pub divisions: Vec<String>,
    pub nights: Vec<String>,
    pub formats: Vec<String>,
    pub contact_type: Option<String>,
    pub comp_levels: Vec<String>,
    pub signup_url: Option<String>,
    pub about: Option<String>,
    pub contact_name: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub verified: bool,
}

#[derive(Insertable, Debug, Clone, PartialEq)]
#[diesel(table_name = crate::schema::events)]
pub struct NewEvent {
    pub name: String,
    pub slug: Option<String>,
    pub kind: String,
    pub state: String,
    pub location: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub fee: Option<i32>,
    pub divisions: Vec<String>,
    pub formats: Vec<String>,
    pub contact_type: Option<String>,
    pub comp_levels: Vec<String>,
    pub website: Option<String>,
    pub signup_url: Option<String>,
    pub about: Option<String>,
    pub contact_name: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub verified: bool,
}

#[derive(Insertable, Debug, Clone, PartialEq)]
#[diesel(table_name = crate::schema::teams)]
pub struct NewTeam {
    pub name: String,
    pub slug: Option<String>,
    pub city_id: Option<i32>,
    pub gender: Option<String>,
    pub age_groups: Vec<String>,
    pub comp_levels: Vec<String>,
    pub formats: Vec<String>,
    pub contact_type: Option<String>,
    pub about: Option<String>,
    pub accomplishments: Option<String>,
    pub website: Option<String>,
    pub contact_name: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub verified: bool,
}
