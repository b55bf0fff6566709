use crate::{FieldDef, FieldKind, Record, RecordGenerator, Schema, Value};
use chrono::{Days, NaiveDate};
use rand::{Rng, SeedableRng, rngs::StdRng};
use std::sync::{Arc, OnceLock};

pub const FIELD_USER_ID: &str = "userId";
pub const FIELD_USERNAME: &str = "username";
pub const FIELD_EMAIL: &str = "email";
pub const FIELD_BIRTHDATE: &str = "birthdate";
pub const FIELD_VEHICLE: &str = "vehicle";

const FIRST_NAMES: &[&str] = &[
    "Alice", "Alvin", "Amara", "Bob", "Bianca", "Carl", "Chloe", "Dale", "Dana", "Elijah", "Erin",
    "Felix", "Freya", "Gale", "Gustavo", "Hal", "Hazel", "Ines", "Ivan", "Jalen", "Judith",
    "Kai", "Kendall", "Luis", "Lola", "Malik", "Maeve", "Nadia", "Noel", "Oscar", "Priya",
    "Quinn", "Rosalie", "Sal", "Tamsin", "Uriel", "Valerie", "Walter", "Xena", "Yusuf", "Zoe",
];

const LAST_NAMES: &[&str] = &[
    "Abbott", "Baldwin", "Castillo", "Dalton", "Ellison", "Fallon", "Gallagher", "Hale",
    "Ibarra", "Jalloh", "Kowalski", "Lindqvist", "Macdonald", "Nakamura", "Okafor", "Palmer",
    "Quintero", "Rosales", "Schmidt", "Talbot", "Underwood", "Vallejo", "Walsh", "Yamamoto",
    "Zielinski",
];

const EMAIL_DOMAINS: &[&str] = &[
    "gmail.com", "yahoo.com", "hotmail.com", "example.org", "mail.net",
];

const VEHICLE_MODELS: &[&str] = &[
    "Fiesta", "Focus", "Mustang", "Explorer", "F-150", "Model T", "Volt", "Malibu", "Impala",
    "Camaro", "Corvette", "Silverado", "El Camino", "Escalade", "Charger", "Challenger",
    "Durango", "Wrangler", "Grand Cherokee", "Model S", "Model 3", "Camry", "Prius",
    "Land Cruiser", "Accord", "Civic", "Sentra", "Altima", "A4", "Beetle", "Golf", "Jetta",
    "911", "Cayenne", "Aventador", "Countach", "XC90", "CX-9", "Roadster", "Spyder",
];

/// Days between 1950-01-01 and 2005-12-31.
const BIRTHDATE_SPAN_DAYS: u64 = 20_453;

/// Layout of the records produced by [`UserRecordGenerator`].
///
/// Every column except `vehicle` is sortable; `vehicle` is the facet column.
pub fn user_schema() -> Arc<Schema> {
    static SCHEMA: OnceLock<Arc<Schema>> = OnceLock::new();
    Arc::clone(SCHEMA.get_or_init(|| {
        let fields = vec![
            FieldDef::new(FIELD_USER_ID, FieldKind::Id)
                .with_label("Id")
                .sortable(),
            FieldDef::new(FIELD_USERNAME, FieldKind::Text)
                .with_label("Username")
                .sortable(),
            FieldDef::new(FIELD_EMAIL, FieldKind::Text)
                .with_label("Email")
                .sortable(),
            FieldDef::new(FIELD_BIRTHDATE, FieldKind::Date)
                .with_label("Birthdate")
                .sortable(),
            FieldDef::new(FIELD_VEHICLE, FieldKind::Text).with_label("Vehicle"),
        ];
        Arc::new(Schema::new(fields, FIELD_USER_ID).expect("userId is a user schema field"))
    }))
}

/// Produces fake user records: uuid, username, email, birthdate, vehicle.
///
/// Seeded generators are fully reproducible.
pub struct UserRecordGenerator {
    rng: StdRng,
    schema: Arc<Schema>,
}

impl UserRecordGenerator {
    pub fn seeded(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        Self::from_rng(StdRng::from_os_rng())
    }

    /// Generator for one generation run: reproducible when `seed` is set,
    /// with a different stream per run.
    pub fn for_run(seed: Option<u64>, epoch: u64) -> Self {
        match seed {
            Some(seed) => Self::seeded(seed.wrapping_add(epoch)),
            None => Self::from_entropy(),
        }
    }

    fn from_rng(rng: StdRng) -> Self {
        Self {
            rng,
            schema: user_schema(),
        }
    }

    fn pick(&mut self, options: &[&'static str]) -> &'static str {
        options[self.rng.random_range(0..options.len())]
    }

    fn username(&mut self) -> String {
        let first = self.pick(FIRST_NAMES);
        let last = self.pick(LAST_NAMES);
        match self.rng.random_range(0..3u8) {
            0 => format!("{first}.{last}{}", self.rng.random_range(0..100u32)),
            1 => format!("{first}_{last}"),
            _ => format!("{first}{}", self.rng.random_range(0..1000u32)),
        }
    }

    fn birthdate(&mut self) -> NaiveDate {
        let start = NaiveDate::from_ymd_opt(1950, 1, 1).unwrap_or_default();
        let offset = self.rng.random_range(0..=BIRTHDATE_SPAN_DAYS);
        start.checked_add_days(Days::new(offset)).unwrap_or(start)
    }
}

impl RecordGenerator for UserRecordGenerator {
    fn schema(&self) -> Arc<Schema> {
        Arc::clone(&self.schema)
    }

    fn next_record(&mut self) -> Record {
        let id = uuid::Builder::from_random_bytes(self.rng.random()).into_uuid();
        let username = self.username();
        let email = format!("{username}@{}", self.pick(EMAIL_DOMAINS));
        let birthdate = self.birthdate();
        let vehicle = self.pick(VEHICLE_MODELS);

        Record::new(vec![
            Value::Id(id.to_string()),
            Value::Text(username),
            Value::Text(email),
            Value::Date(birthdate),
            Value::from(vehicle),
        ])
    }
}
