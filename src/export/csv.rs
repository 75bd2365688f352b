use crate::check::CheckReport;
use crate::error::ExportError;
use std::fs::File;
use std::io::Write;
use std::path::Path;

pub fn export_csv<P: AsRef<Path>>(report: &CheckReport, path: P) -> Result<(), ExportError> {
    let path_ref = path.as_ref();
    let file = File::create(path_ref).map_err(|source| ExportError::FileCreate {
        path: path_ref.to_path_buf(),
        source,
    })?;

    write_csv(report, file)
}

/// One row per unmet requirement.
pub fn write_csv<W: Write>(report: &CheckReport, out: W) -> Result<(), ExportError> {
    let mut writer = csv::Writer::from_writer(out);

    writer.write_record(["Element ID", "Type", "Name", "Missing"])?;

    for element in &report.elements {
        let id = element.id.to_string();
        for missing in &element.missing {
            writer.write_record([&id, &element.entity_type, &element.name, missing])?;
        }
    }

    writer.flush().map_err(|e| ExportError::WriteError {
        message: e.to_string(),
    })?;

    Ok(())
}
