use serde::Deserialize;

use crate::normalize::normalize;

/// WhatsApp sender id (E.164 phone number as the Cloud API reports it).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct UserId(pub String);

impl UserId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Open/closed state derived from the scraper's free-text `estado`.
///
/// The source data is not a clean enum ("Abierto", "Cerrado temporalmente",
/// "Habilitado con restricciones", ...), so the state is substring-derived
/// from the normalized text.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CrossingStatus {
    Open,
    Closed,
    Unknown,
}

impl CrossingStatus {
    pub fn from_raw(raw: &str) -> Self {
        let estado = normalize(raw);
        if estado.contains("abierto") {
            CrossingStatus::Open
        } else if estado.contains("cerrado") {
            CrossingStatus::Closed
        } else {
            CrossingStatus::Unknown
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            CrossingStatus::Open => "🟢",
            CrossingStatus::Closed => "🔴",
            CrossingStatus::Unknown => "⚪",
        }
    }
}

/// One border crossing as the scraper reports it.
///
/// Wire names are the scraper's Spanish field names. Every field defaults to
/// empty: records are loosely typed and an absent field must flow through as
/// an empty string, never as a parse failure.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct CrossingRecord {
    #[serde(default, rename = "nombre")]
    pub name: String,
    #[serde(default, rename = "provincia")]
    pub province: String,
    #[serde(default, rename = "pais")]
    pub country: String,
    #[serde(default, rename = "estado")]
    pub status: String,
    #[serde(default, rename = "localidades")]
    pub localities: String,
    #[serde(default, rename = "ultima_actualizacion")]
    pub last_updated: String,
}

impl CrossingRecord {
    pub fn status_kind(&self) -> CrossingStatus {
        CrossingStatus::from_raw(&self.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_is_substring_derived() {
        assert_eq!(CrossingStatus::from_raw("Abierto"), CrossingStatus::Open);
        assert_eq!(
            CrossingStatus::from_raw("ABIERTO con restricciones"),
            CrossingStatus::Open
        );
        assert_eq!(
            CrossingStatus::from_raw("Cerrado temporalmente"),
            CrossingStatus::Closed
        );
        assert_eq!(CrossingStatus::from_raw("Habilitado"), CrossingStatus::Unknown);
        assert_eq!(CrossingStatus::from_raw(""), CrossingStatus::Unknown);
    }

    #[test]
    fn missing_fields_deserialize_to_empty() {
        let record: CrossingRecord =
            serde_json::from_str(r#"{"nombre": "Cristo Redentor"}"#).unwrap();
        assert_eq!(record.name, "Cristo Redentor");
        assert_eq!(record.province, "");
        assert_eq!(record.country, "");
        assert_eq!(record.status, "");
        assert_eq!(record.status_kind(), CrossingStatus::Unknown);
    }

    #[test]
    fn spanish_wire_names_map_to_fields() {
        let record: CrossingRecord = serde_json::from_str(
            r#"{
                "nombre": "Paso de Jama",
                "provincia": "Jujuy",
                "pais": "Chile",
                "estado": "Abierto",
                "localidades": "Susques - San Pedro de Atacama",
                "ultima_actualizacion": "Actualizado hace 5 minutos"
            }"#,
        )
        .unwrap();
        assert_eq!(record.province, "Jujuy");
        assert_eq!(record.country, "Chile");
        assert_eq!(record.last_updated, "Actualizado hace 5 minutos");
    }
}
