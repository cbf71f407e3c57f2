//! Serializing result sets and distinct values to text.
//!
//! Every renderer is deterministic: output depends only on column order, record
//! order and values. Rendered text always ends with a newline unless it is empty.

use super::emi::emi_name;
use super::{Distinct, Format, Output, ResultSet};
use crate::catalog::AttributeDescriptor;
use crate::error::Result;
use crate::model::Record;
use serde_json::{Map, Value};

pub fn render(output: &Output, format: Format) -> Result<String> {
    match output {
        Output::Table(set) => render_table(set, format),
        Output::Distinct(distinct) => render_distinct(distinct, format),
    }
}

pub fn render_table(set: &ResultSet, format: Format) -> Result<String> {
    match format {
        Format::Plain => Ok(plain(set)),
        Format::Csv => Ok(csv(set)),
        Format::Json => json(set),
        Format::Emi => emi(set),
    }
}

/// Distinct values have no CSV or EMI shape; those formats fall back to plain.
pub fn render_distinct(distinct: &Distinct, format: Format) -> Result<String> {
    match format {
        Format::Json => {
            let mut object = Map::new();
            for group in &distinct.groups {
                let ids = group.ids.iter().cloned().map(Value::String).collect();
                object.insert(group.value.clone(), Value::Array(ids));
            }
            Ok(format!("{}\n", serde_json::to_string(&Value::Object(object))?))
        }
        Format::Plain | Format::Csv | Format::Emi => Ok(distinct
            .values()
            .map(|value| format!("{}\n", value))
            .collect()),
    }
}

fn present<'a>(set: &'a ResultSet, record: &'a Record) -> impl Iterator<Item = (&'static AttributeDescriptor, &'a [String])> + 'a {
    set.columns
        .iter()
        .filter_map(move |column| record.get(column.canonical).map(|values| (*column, values)))
}

fn plain(set: &ResultSet) -> String {
    let blocks: Vec<String> = set
        .records
        .iter()
        .map(|record| {
            present(set, record)
                .map(|(column, values)| format!("{}: {}\n", column.canonical, values.join(", ")))
                .collect::<String>()
        })
        .filter(|block| !block.is_empty())
        .collect();
    blocks.join("\n")
}

fn csv_field(field: &str, force_quotes: bool) -> String {
    if force_quotes || field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn csv(set: &ResultSet) -> String {
    if set.columns.is_empty() {
        return String::new();
    }
    let mut out = String::new();
    let header: Vec<&str> = set.columns.iter().map(|c| c.canonical).collect();
    out.push_str(&header.join(","));
    out.push('\n');
    for record in &set.records {
        let row: Vec<String> = set
            .columns
            .iter()
            .map(|column| match record.get(column.canonical) {
                Some(values) => csv_field(&values.join(","), column.multi_valued),
                None => String::new(),
            })
            .collect();
        out.push_str(&row.join(","));
        out.push('\n');
    }
    out
}

fn json_value(column: &AttributeDescriptor, values: &[String]) -> Value {
    match (column.multi_valued, values) {
        (false, [single]) => Value::String(single.clone()),
        _ => Value::Array(values.iter().cloned().map(Value::String).collect()),
    }
}

fn json(set: &ResultSet) -> Result<String> {
    let mut object = Map::new();
    for record in &set.records {
        let attributes: Map<String, Value> = present(set, record)
            .map(|(column, values)| (column.canonical.to_string(), json_value(column, values)))
            .collect();
        object.insert(record.id().to_string(), Value::Object(attributes));
    }
    Ok(format!("{}\n", serde_json::to_string(&Value::Object(object))?))
}

fn emi(set: &ResultSet) -> Result<String> {
    let entries: Vec<Value> = set
        .records
        .iter()
        .map(|record| {
            let fields: Map<String, Value> = present(set, record)
                .filter_map(|(column, values)| {
                    emi_name(column.canonical).map(|name| (name.to_string(), json_value(column, values)))
                })
                .collect();
            Value::Object(fields)
        })
        .collect();
    Ok(format!("{}\n", serde_json::to_string(&Value::Array(entries))?))
}
