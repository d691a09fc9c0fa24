use std::time::Duration;

use anyhow::Result;
use tracing::{debug, info, warn};

use crate::fields::{FieldDescriptor, ValueReader, FIELDS};
use crate::models::{DraftRecord, FieldValue};
use crate::scrapers::traits::Page;

/// Extract one field per its descriptor.
///
/// `None` means nothing matched within the timeout or every match read
/// empty; the listing goes on without this field. Node read failures are
/// page-capability failures and propagate.
pub fn extract(
    page: &dyn Page,
    desc: &FieldDescriptor,
    timeout: Duration,
) -> Result<Option<FieldValue>> {
    debug!("Getting field value for field {}", desc.name);

    let nodes = page.locate_all(&desc.locator, timeout)?;
    if nodes.is_empty() {
        warn!("Couldn't find the element for field {}, skipping...", desc.name);
        return Ok(None);
    }

    // Distinct raw values, first occurrence wins. The source system folded
    // through an unordered set; keeping encounter order makes joins and
    // picture order deterministic.
    let mut raw: Vec<String> = Vec::new();
    for node in &nodes {
        let value = match desc.reader {
            Some(ValueReader::Property(name)) => Some(node.property(name)?),
            Some(ValueReader::LastToken) => {
                let text = node.text()?;
                Some(text.split_whitespace().last().unwrap_or_default().to_owned())
            }
            None => {
                let text = node.text()?;
                (!text.is_empty()).then_some(text)
            }
        };
        if let Some(value) = value {
            if !raw.contains(&value) {
                raw.push(value);
            }
        }
    }

    let folded = match raw.len() {
        0 => None,
        1 => Some(FieldValue::Scalar(raw.remove(0))),
        _ => match desc.joiner {
            Some(joiner) => Some(FieldValue::Scalar(raw.join(joiner))),
            None => Some(FieldValue::Many(raw)),
        },
    };

    if let Some(value) = &folded {
        info!("Got value {:?} for field {}", value, desc.name);
    }
    Ok(folded)
}

/// Run every descriptor in table order against the page, producing the
/// draft record for one listing. Absent fields are simply missing; only a
/// page-capability failure aborts.
pub fn assemble(page: &dyn Page, page_url: &str, timeout: Duration) -> Result<DraftRecord> {
    let mut record = DraftRecord::new(page_url);
    for desc in FIELDS {
        if let Some(value) = extract(page, desc, timeout)? {
            record.fields.insert(desc.name, value);
        }
    }
    Ok(record)
}
