use colored::Colorize;
use ginfo::api::MessageLevel;
use ginfo::catalog::{AttributeDescriptor, Catalog};
use ginfo::engine::Message;
use ginfo::model::ObjectType;

const INDENT: &str = "        ";

/// Prints messages; informational ones to stdout, warnings to stderr.
///
/// Returns whether anything was printed to stdout.
pub(super) fn print_messages(messages: &[Message]) -> bool {
    let mut printed = false;
    for message in messages {
        match message.level {
            MessageLevel::Info => {
                println!("{}", message.content.dimmed());
                printed = true;
            }
            MessageLevel::Warning => eprintln!("{}", message.content.yellow()),
        }
    }
    printed
}

fn flag(descriptor: &AttributeDescriptor) -> String {
    match descriptor.short_alias {
        Some(short) => format!("-{}, --{}", short, descriptor.long_alias),
        None => format!("    --{}", descriptor.long_alias),
    }
}

fn table(rows: &[(String, &str)]) -> String {
    let width = rows.iter().map(|(left, _)| left.len()).max().unwrap_or(0) + 2;
    rows.iter()
        .map(|(left, right)| format!("{}{:<width$}{}\n", INDENT, left, right, width = width))
        .collect()
}

/// The attributes usable without naming an object, and the objects that can be named.
pub(super) fn format_available_attributes(catalog: &Catalog) -> String {
    let rows: Vec<(String, &str)> = catalog
        .service_view()
        .map(|descriptor| (flag(descriptor), descriptor.canonical))
        .collect();

    let mut out = String::from("Available attributes are:\n");
    out.push_str(&table(&rows));
    out.push_str("\nAvailable objects are (see ginfo --list <OBJECT>):\n");
    for object in ObjectType::ALL {
        out.push_str(&format!("{}{}\n", INDENT, object));
    }
    out
}

/// Every attribute of `object`: its label, canonical name and filter flag.
pub(super) fn format_object_attributes(catalog: &Catalog, object: ObjectType) -> String {
    let descriptors: Vec<&AttributeDescriptor> = catalog.by_object(object).collect();
    let label_width = descriptors.iter().map(|d| d.label.len()).max().unwrap_or(0) + 2;
    let name_width = descriptors.iter().map(|d| d.canonical.len()).max().unwrap_or(0) + 2;

    let mut out = format!("Attributes of {}:\n", object);
    for descriptor in descriptors {
        out.push_str(&format!(
            "{}{:<label_width$}{:<name_width$}{}\n",
            INDENT,
            descriptor.label,
            descriptor.canonical,
            flag(descriptor).trim_start(),
            label_width = label_width,
            name_width = name_width
        ));
    }
    out
}
