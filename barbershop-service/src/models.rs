//! Barber and appointment records as stored and served.
//!
//! Every field except `id` is optional on the wire: a PATCH replaces the whole
//! record, and a field omitted from the replacement is absent afterwards.
//! `start` keeps the text the client sent; only creation checks its format.

use serde::{Deserialize, Serialize};
use serde_json::Number;
use uuid::Uuid;

use crate::store::{Record, Store};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Barber {
    pub id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
}

/// Barber fields without the id; used for creation and full replacement.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BarberInput {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

impl Record for Barber {
    type Input = BarberInput;

    fn assemble(id: Uuid, input: BarberInput) -> Self {
        Self {
            id,
            name: input.name,
            last_name: input.last_name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minutes_duration: Option<Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub barber_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_email: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentInput {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub start: Option<String>,
    #[serde(default)]
    pub minutes_duration: Option<Number>,
    #[serde(default)]
    pub price: Option<Number>,
    #[serde(default)]
    pub barber_id: Option<String>,
    #[serde(default)]
    pub client_email: Option<String>,
}

impl Record for Appointment {
    type Input = AppointmentInput;

    fn assemble(id: Uuid, input: AppointmentInput) -> Self {
        Self {
            id,
            name: input.name,
            start: input.start,
            minutes_duration: input.minutes_duration,
            price: input.price,
            barber_id: input.barber_id,
            client_email: input.client_email,
        }
    }
}

pub type BarberStore = Store<Barber>;
pub type AppointmentStore = Store<Appointment>;

impl Store<Appointment> {
    /// Appointments whose `barberId` equals `barber_id`. Linear scan; the
    /// barber itself does not have to exist.
    pub fn list_by_barber_id(&self, barber_id: &str) -> Vec<Appointment> {
        self.filter(|appointment| appointment.barber_id.as_deref() == Some(barber_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn appointment_for(barber_id: &str) -> AppointmentInput {
        AppointmentInput {
            name: Some("Haircut".into()),
            barber_id: Some(barber_id.into()),
            ..AppointmentInput::default()
        }
    }

    #[test]
    fn list_by_barber_id_filters_on_equality() {
        let store = AppointmentStore::new();
        let first = store.add(appointment_for("b-1"));
        let second = store.add(appointment_for("b-1"));
        store.add(appointment_for("b-2"));
        store.add(AppointmentInput::default());

        let mut ids: Vec<Uuid> = store.list_by_barber_id("b-1").into_iter().map(|a| a.id).collect();
        ids.sort();
        let mut expected = vec![first.id, second.id];
        expected.sort();
        assert_eq!(ids, expected);
    }

    #[test]
    fn list_by_barber_id_is_empty_for_unknown_barber() {
        let store = AppointmentStore::new();
        store.add(appointment_for("b-1"));
        assert!(store.list_by_barber_id("nobody").is_empty());
        assert!(store.list_by_barber_id("").is_empty());
    }

    #[test]
    fn barber_serializes_camel_case_and_omits_absent_fields() {
        let barber = Barber::assemble(
            Uuid::nil(),
            BarberInput { name: Some("John".into()), last_name: None },
        );
        assert_eq!(
            serde_json::to_value(&barber).unwrap(),
            json!({ "id": Uuid::nil(), "name": "John" })
        );
    }

    #[test]
    fn appointment_numbers_keep_their_representation() {
        let input: AppointmentInput = serde_json::from_value(json!({
            "minutesDuration": 45,
            "price": 12.5
        }))
        .unwrap();
        let appointment = Appointment::assemble(Uuid::nil(), input);
        let value = serde_json::to_value(&appointment).unwrap();
        assert_eq!(value["minutesDuration"], json!(45));
        assert_eq!(value["price"], json!(12.5));
    }
}
