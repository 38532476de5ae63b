//! Per-employee asset assignment record ("acta").

use crate::core::{
    cache::TableCache,
    document::Document,
    records::{Employee, Hardware, License, NOT_AVAILABLE, WebAccess, format_date},
};
use chrono::NaiveDateTime;

/// Timestamp format printed in the acta.
pub const GENERATED_AT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const TITLE: &str = "Acta de Asignación de Activos TIC";
const SIGNATURE_LINE: &str = "_________________________";

/// Everything the acta shows about one employee.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActaData {
    /// The employee the acta is for
    pub employee: Employee,
    /// Hardware assigned to the employee, in source order
    pub hardware: Vec<Hardware>,
    /// Licenses assigned to the employee, in source order
    pub licenses: Vec<License>,
    /// Web accesses assigned to the employee, in source order
    pub web_accesses: Vec<WebAccess>,
}

impl ActaData {
    /// Gathers the employee and their assets from the cache.
    ///
    /// Returns `None` when the employees table is absent or has no row with
    /// `employee_id`. Absent asset tables just contribute no rows.
    pub async fn collect(cache: &TableCache, employee_id: i64) -> Option<Self> {
        let employees = cache.employees().await?;
        let employee = employees.find(employee_id)?.clone();

        let hardware: Vec<Hardware> = cache
            .hardware()
            .await
            .map(|t| t.assigned_to(employee_id).cloned().collect())
            .unwrap_or_default();
        let licenses: Vec<License> = cache
            .licenses()
            .await
            .map(|t| t.assigned_to(employee_id).cloned().collect())
            .unwrap_or_default();
        let web_accesses: Vec<WebAccess> = cache
            .web_accesses()
            .await
            .map(|t| t.assigned_to(employee_id).cloned().collect())
            .unwrap_or_default();

        Some(Self {
            employee,
            hardware,
            licenses,
            web_accesses,
        })
    }
}

/// Download name of the acta for `employee_id`.
#[must_use]
pub fn acta_filename(employee_id: i64) -> String {
    format!("Acta_Asignacion_Empleado_{employee_id}.docx")
}

fn or_na(value: Option<&str>) -> String {
    value.unwrap_or(NOT_AVAILABLE).to_string()
}

/// Lays out the acta for `data`, stamped with `generated_at`.
#[must_use]
pub fn build_acta(data: &ActaData, generated_at: NaiveDateTime) -> Document {
    let employee = &data.employee;
    let mut doc = Document::new();

    doc.centered_heading(0, TITLE);

    doc.heading(1, "Información del Empleado")
        .paragraph(format!("Nombre: {}", employee.name))
        .paragraph(format!(
            "Departamento: {}",
            or_na(employee.department.as_deref())
        ))
        .paragraph(format!("Cargo: {}", or_na(employee.position.as_deref())))
        .paragraph(format!(
            "Fecha de Generación: {}",
            generated_at.format(GENERATED_AT_FORMAT)
        ))
        .blank();

    doc.heading(1, "Equipos de Hardware Asignados");
    if data.hardware.is_empty() {
        doc.paragraph("No hay equipos de hardware asignados.");
    } else {
        let rows = data
            .hardware
            .iter()
            .map(|h| {
                vec![
                    or_na(h.hardware_type.as_deref()),
                    or_na(h.brand.as_deref()),
                    or_na(h.serial_number.as_deref()),
                    or_na(h.location.as_deref()),
                ]
            })
            .collect();
        doc.table(["Tipo", "Marca", "Serial", "Ubicación"], rows);
    }
    doc.blank();

    doc.heading(1, "Licencias de Software Asignadas");
    if data.licenses.is_empty() {
        doc.paragraph("No hay licencias de software asignadas.");
    } else {
        let rows = data
            .licenses
            .iter()
            .map(|l| {
                vec![
                    or_na(l.software_name.as_deref()),
                    or_na(l.license_key.as_deref()),
                    or_na(format_date(l.expiration_date).as_deref()),
                ]
            })
            .collect();
        doc.table(["Software", "Clave", "Expiración"], rows);
    }
    doc.blank();

    doc.heading(1, "Accesos Web Asignados");
    if data.web_accesses.is_empty() {
        doc.paragraph("No hay accesos web asignados.");
    } else {
        let rows = data
            .web_accesses
            .iter()
            .map(|w| {
                vec![
                    or_na(w.service_name.as_deref()),
                    or_na(w.url.as_deref()),
                    or_na(w.access_username.as_deref()),
                ]
            })
            .collect();
        doc.table(["Servicio", "URL", "Usuario"], rows);
    }

    doc.page_break()
        .heading(1, "Firmas")
        .paragraph(format!(
            "\n\n{SIGNATURE_LINE}\nFirma del Empleado: {}",
            employee.name
        ))
        .paragraph(format!(
            "\n\n{SIGNATURE_LINE}\nFirma del Responsable (Admin)"
        ));

    doc
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::document::Block;
    use crate::core::source::DataSource;
    use crate::errors::Result;
    use crate::test_utils::{csv_dir, employee, hardware, write_csv};
    use chrono::NaiveDate;

    fn pinned_time() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 2, 3)
            .and_then(|d| d.and_hms_opt(14, 5, 9))
            .unwrap_or_default()
    }

    fn data_for(employee: Employee) -> ActaData {
        ActaData {
            employee,
            hardware: Vec::new(),
            licenses: Vec::new(),
            web_accesses: Vec::new(),
        }
    }

    fn paragraphs(doc: &Document) -> Vec<&str> {
        doc.blocks()
            .iter()
            .filter_map(|b| match b {
                Block::Paragraph(text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    fn headings(doc: &Document) -> Vec<&str> {
        doc.blocks()
            .iter()
            .filter_map(|b| match b {
                Block::Heading { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_sections_appear_in_order() {
        let doc = build_acta(&data_for(employee(7, "Ana", Some("IT"))), pinned_time());

        assert_eq!(
            headings(&doc),
            vec![
                "Acta de Asignación de Activos TIC",
                "Información del Empleado",
                "Equipos de Hardware Asignados",
                "Licencias de Software Asignadas",
                "Accesos Web Asignados",
                "Firmas",
            ]
        );
        assert!(matches!(
            doc.blocks()[0],
            Block::Heading { centered: true, level: 0, .. }
        ));

        let page_break = doc.blocks().iter().position(|b| *b == Block::PageBreak);
        let firmas = doc
            .blocks()
            .iter()
            .position(|b| matches!(b, Block::Heading { text, .. } if text == "Firmas"));
        assert_eq!(page_break.map(|p| p + 1), firmas);
    }

    #[test]
    fn test_employee_info_uses_not_available() {
        let doc = build_acta(&data_for(employee(7, "Ana", None)), pinned_time());
        let text = paragraphs(&doc);

        assert!(text.contains(&"Nombre: Ana"));
        assert!(text.contains(&"Departamento: N/A"));
        assert!(text.contains(&"Cargo: N/A"));
        assert!(text.contains(&"Fecha de Generación: 2025-02-03 14:05:09"));
    }

    #[test]
    fn test_empty_sections_use_sentences() {
        let doc = build_acta(&data_for(employee(7, "Ana", None)), pinned_time());
        let text = paragraphs(&doc);

        assert!(text.contains(&"No hay equipos de hardware asignados."));
        assert!(text.contains(&"No hay licencias de software asignadas."));
        assert!(text.contains(&"No hay accesos web asignados."));
        assert!(!doc.blocks().iter().any(|b| matches!(b, Block::Table { .. })));
    }

    #[test]
    fn test_asset_tables_fill_missing_values() {
        let mut data = data_for(employee(7, "Ana", Some("IT")));
        data.hardware = vec![hardware(1, Some("Laptop"), Some(7))];
        data.licenses = vec![License {
            id: 3,
            software_name: Some("Office".to_string()),
            license_key: None,
            purchase_date: None,
            expiration_date: NaiveDate::from_ymd_opt(2026, 1, 31),
            employee_id: Some(7),
        }];

        let doc = build_acta(&data, pinned_time());
        let tables: Vec<(&Vec<String>, &Vec<Vec<String>>)> = doc
            .blocks()
            .iter()
            .filter_map(|b| match b {
                Block::Table { headers, rows } => Some((headers, rows)),
                _ => None,
            })
            .collect();

        assert_eq!(tables.len(), 2);
        assert_eq!(tables[0].0, &vec!["Tipo", "Marca", "Serial", "Ubicación"]);
        assert_eq!(tables[0].1[0], vec!["Laptop", "N/A", "N/A", "N/A"]);
        assert_eq!(tables[1].0, &vec!["Software", "Clave", "Expiración"]);
        assert_eq!(tables[1].1[0], vec!["Office", "N/A", "2026-01-31"]);
        assert!(paragraphs(&doc).contains(&"No hay accesos web asignados."));
    }

    #[test]
    fn test_signature_blocks() {
        let doc = build_acta(&data_for(employee(7, "Ana", None)), pinned_time());
        let text = paragraphs(&doc);

        assert!(text.contains(&"\n\n_________________________\nFirma del Empleado: Ana"));
        assert!(text.contains(&"\n\n_________________________\nFirma del Responsable (Admin)"));
    }

    #[test]
    fn test_filename() {
        assert_eq!(acta_filename(42), "Acta_Asignacion_Empleado_42.docx");
    }

    #[tokio::test]
    async fn test_collect_filters_assets_by_employee() -> Result<()> {
        let dir = csv_dir()?;
        write_csv(dir.path(), "employees", "id,name\n1,Ana\n2,Bea\n")?;
        write_csv(
            dir.path(),
            "hardware",
            "id,type,serial_number,employee_id\n1,Laptop,S1,1\n2,Monitor,S2,2\n3,Dock,S3,1\n4,Mouse,S4,\n",
        )?;
        write_csv(
            dir.path(),
            "web_accesses",
            "id,service_name,url,access_username,access_password,employee_id\n1,Jira,https://jira,ana,secret,1\n",
        )?;
        let cache = TableCache::new(DataSource::CsvDirectory(dir.path().to_path_buf()));

        let data = ActaData::collect(&cache, 1)
            .await
            .ok_or_else(|| crate::errors::Error::render("employee 1 should exist"))?;
        assert_eq!(data.employee.name, "Ana");
        let ids: Vec<i64> = data.hardware.iter().map(|h| h.id).collect();
        assert_eq!(ids, vec![1, 3]);
        // No licenses.csv in the directory.
        assert!(data.licenses.is_empty());
        assert_eq!(data.web_accesses.len(), 1);

        assert!(ActaData::collect(&cache, 999).await.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_collect_without_employees_table_is_none() -> Result<()> {
        let dir = csv_dir()?;
        let cache = TableCache::new(DataSource::CsvDirectory(dir.path().to_path_buf()));

        assert!(ActaData::collect(&cache, 1).await.is_none());
        Ok(())
    }
}
