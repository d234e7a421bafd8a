//! Rendering matched records into WhatsApp-flavored text.
//!
//! WhatsApp markdown: single `*` pairs render bold. Every record renders as a
//! fixed four-line block; blocks and sections are separated by one blank
//! line, which is also the boundary the chunker splits at.

use crate::domain::CrossingRecord;
use crate::grouping::{GroupKey, MatchGroup};

pub fn greeting_message() -> String {
    "¡Hola! 👋\n\
     Consultá el estado de los pasos internacionales de Argentina en tiempo real.\n\
     Ingresá el nombre del paso, la provincia en la que se encuentra o el país con el que conecta."
        .to_string()
}

pub fn too_short_message(min_len: usize) -> String {
    format!(
        "Necesito un poco más de texto para buscar (al menos {min_len} letras).\n\
         Ingresá el nombre del paso, la provincia o el país con el que conecta."
    )
}

pub fn no_match_message(raw_text: &str) -> String {
    format!(
        "No encontré pasos que coincidan con '{raw_text}'. ❌\n\
         Probá ingresando nuevamente el nombre del paso, la provincia o el país con el que conecta."
    )
}

pub fn unsupported_message() -> String {
    "👀 Por ahora sólo puedo responder a mensajes de texto.".to_string()
}

pub fn ack_message() -> String {
    "Procesando tu solicitud... ⏳".to_string()
}

/// Four-line record block: bold name header, localities, status + icon,
/// last-updated.
pub fn render_record(record: &CrossingRecord) -> String {
    format!(
        "*Paso internacional {}*\n{}\n{} {}\n{}",
        record.name,
        record.localities,
        record.status,
        record.status_kind().icon(),
        record.last_updated
    )
}

fn group_header(key: &GroupKey) -> Option<String> {
    match key {
        GroupKey::Name | GroupKey::All => None,
        GroupKey::Province(province) => {
            Some(format!("👉 *Pasos internacionales en {province}*"))
        }
        GroupKey::Country(country) => Some(format!("👉 *Pasos internacionales con {country}*")),
        GroupKey::Status(status) => Some(format!("👉 *Pasos internacionales {status}s*")),
        GroupKey::Combined {
            province,
            country,
            status,
        } => {
            let mut header = String::from("👉 *Pasos internacionales");
            if let Some(filter) = status {
                header.push(' ');
                header.push_str(filter.label());
            }
            if let Some(province) = province {
                header.push_str(" en ");
                header.push_str(province);
            }
            if let Some(country) = country {
                header.push_str(" con ");
                header.push_str(country);
            }
            header.push('*');
            Some(header)
        }
    }
}

/// Render groups in their canonical order: optional header line on top of
/// each group's blocks, one blank line between blocks and between sections.
pub fn render_groups(groups: &[MatchGroup]) -> String {
    let mut sections = Vec::with_capacity(groups.len());
    for group in groups {
        let blocks = group
            .records
            .iter()
            .map(render_record)
            .collect::<Vec<_>>()
            .join("\n\n");
        match group_header(&group.key) {
            Some(header) => sections.push(format!("{header}\n{blocks}")),
            None => sections.push(blocks),
        }
    }
    sections.join("\n\n")
}

/// Footer appended to a count-bounded page when more records remain.
/// `start`/`end` are the served half-open slice bounds.
pub fn page_footer(start: usize, end: usize, total: usize) -> String {
    format!(
        "Mostrando {}-{} de {}. Escribí *ver más* para seguir.",
        start + 1,
        end,
        total
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::StatusFilter;

    fn record(name: &str, status: &str) -> CrossingRecord {
        CrossingRecord {
            name: name.to_string(),
            province: "Mendoza".to_string(),
            country: "Chile".to_string(),
            status: status.to_string(),
            localities: "Las Cuevas - Los Andes".to_string(),
            last_updated: "Actualizado hace 10 minutos".to_string(),
        }
    }

    #[test]
    fn record_block_has_four_lines_and_icon() {
        let block = render_record(&record("Cristo Redentor", "Abierto"));
        assert_eq!(
            block,
            "*Paso internacional Cristo Redentor*\n\
             Las Cuevas - Los Andes\n\
             Abierto 🟢\n\
             Actualizado hace 10 minutos"
        );
        assert_eq!(block.lines().count(), 4);
    }

    #[test]
    fn closed_and_unknown_icons() {
        assert!(render_record(&record("X", "Cerrado")).contains("🔴"));
        assert!(render_record(&record("X", "Sin datos")).contains("⚪"));
    }

    #[test]
    fn province_group_gets_header_and_blank_lines() {
        let groups = vec![MatchGroup {
            key: GroupKey::Province("Mendoza".to_string()),
            records: vec![record("Cristo Redentor", "Abierto"), record("Pehuenche", "Cerrado")],
        }];
        let msg = render_groups(&groups);
        assert!(msg.starts_with("👉 *Pasos internacionales en Mendoza*\n*Paso internacional"));
        assert_eq!(msg.matches("\n\n").count(), 1);
    }

    #[test]
    fn name_group_has_no_header() {
        let groups = vec![MatchGroup {
            key: GroupKey::Name,
            records: vec![record("Cristo Redentor", "Abierto")],
        }];
        assert!(render_groups(&groups).starts_with("*Paso internacional"));
    }

    #[test]
    fn combined_header_mentions_all_active_dimensions() {
        let groups = vec![MatchGroup {
            key: GroupKey::Combined {
                province: None,
                country: Some("Brasil".to_string()),
                status: Some(StatusFilter::Open),
            },
            records: vec![record("Iguazú", "Abierto")],
        }];
        let msg = render_groups(&groups);
        assert!(msg.starts_with("👉 *Pasos internacionales abiertos con Brasil*\n"));
    }

    #[test]
    fn no_match_message_quotes_raw_text() {
        let msg = no_match_message("Paso Inexistente");
        assert!(msg.contains("'Paso Inexistente'"));
        assert!(msg.contains("❌"));
    }

    #[test]
    fn page_footer_is_one_based() {
        assert_eq!(
            page_footer(10, 20, 23),
            "Mostrando 11-20 de 23. Escribí *ver más* para seguir."
        );
    }
}
