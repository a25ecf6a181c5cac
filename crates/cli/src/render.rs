//! Plain-text rendering of page view models.

use std::fmt::Write;

use bistro_client::ApiError;
use bistro_pages::{FormView, ListView, Loadable, Table};
use bistro_schema::{EntityType, FieldKind};

pub fn list(title: &str, view: &ListView) -> String {
	match view {
		ListView::Loading => format!("{title}\nLoading...\n"),
		ListView::Error(banner) => format!("{title}\n[error] {banner}\n"),
		ListView::Table(table) => format!("{title}\n{}", self::table(table)),
	}
}

/// Left-aligned columns separated by two spaces, header underlined.
pub fn table(table: &Table) -> String {
	let widths: Vec<usize> = table
		.columns
		.iter()
		.enumerate()
		.map(|(i, column)| {
			table
				.rows
				.iter()
				.filter_map(|row| row.get(i))
				.map(|cell| cell.chars().count())
				.chain([column.len()])
				.max()
				.unwrap_or_default()
		})
		.collect();

	let mut out = String::new();
	push_row(&mut out, table.columns.iter().copied(), &widths);
	push_row(&mut out, widths.iter().map(|width| "-".repeat(*width)), &widths);
	for row in &table.rows {
		push_row(&mut out, row.iter().map(String::as_str), &widths);
	}
	if table.rows.is_empty() {
		out.push_str("(no records)\n");
	}
	out
}

fn push_row<S: AsRef<str>>(out: &mut String, cells: impl Iterator<Item = S>, widths: &[usize]) {
	let line = cells
		.zip(widths.iter().copied())
		.map(|(cell, width)| format!("{:<width$}", cell.as_ref()))
		.collect::<Vec<_>>()
		.join("  ");
	out.push_str(line.trim_end());
	out.push('\n');
}

pub fn form(view: &FormView) -> String {
	let mut out = format!("{}\n", view.title);
	if let Some(banner) = &view.banner {
		let _ = writeln!(out, "[error] {banner}");
	}
	for field in &view.fields {
		let marker = if field.required { "*" } else { " " };
		let _ = writeln!(out, "{marker} {:<14} {}", field.label, field.value);
		if let Some(error) = &field.error {
			let _ = writeln!(out, "    ! {error}");
		}
		if let Some(options) = &field.options {
			for option in options {
				let _ = writeln!(out, "    - {} ({})", option.label, option.id);
			}
		}
		if field.options_loading {
			let _ = writeln!(out, "    ... loading options");
		}
		if let Some(error) = &field.options_error {
			let _ = writeln!(out, "    ! options unavailable: {error}");
		}
	}
	let state = match (view.submitting, view.valid) {
		(true, _) => "submitting",
		(false, true) => "valid",
		(false, false) => "invalid",
	};
	let _ = writeln!(out, "[{state}]");
	out
}

pub fn edit(view: &Loadable<FormView>) -> String {
	match view {
		Loadable::Loading => "Loading...\n".to_string(),
		Loadable::Ready(form) => self::form(form),
		Loadable::Failed(error) => page_error(error),
	}
}

fn page_error(error: &ApiError) -> String {
	if error.is_not_found() {
		format!("[not found] {error}\n")
	} else {
		format!("[error] {error}\n")
	}
}

/// Catalog overview for `entities`.
pub fn entities() -> String {
	let mut out = String::new();
	for entity in EntityType::ALL {
		let _ = writeln!(out, "{} ({})", entity.title(), entity.path());
		for field in entity.schema().fields {
			let kind = match field.kind {
				FieldKind::Text => "text".to_string(),
				FieldKind::Integer => "integer".to_string(),
				FieldKind::Number => "number".to_string(),
				FieldKind::Bool => "bool".to_string(),
				FieldKind::Date => "date".to_string(),
				FieldKind::Relation(target) => format!("-> {}", target.path()),
			};
			let required = if field.required { ", required" } else { "" };
			let _ = writeln!(out, "  {} ({kind}{required})", field.name);
		}
	}
	out
}
