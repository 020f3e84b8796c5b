use std::fmt;
use std::io::{self, Write};

use crossterm::style::Stylize;
use serde_with::{DeserializeFromStr, SerializeDisplay};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator, VariantNames};
use tracing::trace;

use crate::objects::redmine::*;

use super::*;

/// Render a journal entry using the reference tables of its parent issue.
pub trait JournalRender {
    fn render_journal<W: Write>(
        &self,
        f: &mut W,
        journal: &Journal,
        lookups: &Lookups,
        width: usize,
    ) -> io::Result<()>;
}

/// Journal renderer listing field changes followed by any notes.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultJournal;

impl JournalRender for DefaultJournal {
    fn render_journal<W: Write>(
        &self,
        f: &mut W,
        journal: &Journal,
        lookups: &Lookups,
        width: usize,
    ) -> io::Result<()> {
        writeln!(f)?;
        if journal.private_notes {
            write!(f, "(private) ")?;
        }
        let created = &journal.created_on;
        writeln!(
            f,
            "Updated by {} on {} {}",
            journal.user,
            created.date(),
            created.time()
        )?;

        for detail in &journal.details {
            writeln!(f, "  * {}", describe(detail, lookups))?;
        }

        let notes = journal.notes.as_deref().map(str::trim);
        if let Some(notes) = notes.filter(|s| !s.is_empty()) {
            writeln!(f)?;
            for line in textwrap::wrap(notes, wrap_options(width)) {
                writeln!(f, "{line}")?;
            }
        }

        Ok(())
    }
}

/// Human-readable label for a changed issue attribute.
fn attr_label(name: &str) -> &str {
    match name {
        "status_id" => "Status",
        "priority_id" => "Priority",
        "assigned_to_id" => "Assignee",
        "tracker_id" => "Tracker",
        "project_id" => "Project",
        "category_id" => "Category",
        "fixed_version_id" => "Target version",
        "parent_id" => "Parent task",
        "done_ratio" => "% Done",
        "subject" => "Subject",
        "description" => "Description",
        "start_date" => "Start date",
        "due_date" => "Due date",
        "estimated_hours" => "Estimated time",
        "is_private" => "Private",
        name => name,
    }
}

/// Resolve an id-valued attribute to its display name when possible.
fn resolve<'a>(name: &str, value: &'a str, lookups: &'a Lookups) -> &'a str {
    let lookup = match name {
        "status_id" => &lookups.statuses,
        "priority_id" => &lookups.priorities,
        "assigned_to_id" => &lookups.users,
        _ => return value,
    };

    match value.parse().ok().and_then(|id| lookup.get(id)) {
        Some(resolved) => resolved,
        None => {
            trace!("unresolved journal value: {name}={value}");
            value
        }
    }
}

/// Describe a single journal change.
fn describe(detail: &JournalDetail, lookups: &Lookups) -> String {
    let name = detail.name.as_str();
    let old = detail.old_value.as_deref().filter(|s| !s.is_empty());
    let new = detail.new_value.as_deref().filter(|s| !s.is_empty());

    match detail.property.as_str() {
        "attachment" => match (old, new) {
            (_, Some(file)) => format!("File {file} added"),
            (Some(file), None) => format!("File {file} deleted"),
            (None, None) => format!("File {name} changed"),
        },
        "relation" => match (old, new) {
            (_, Some(id)) => format!("Relation {name} #{id} added"),
            (Some(id), None) => format!("Relation {name} #{id} deleted"),
            (None, None) => format!("Relation {name} changed"),
        },
        _ if name == "description" => "Description updated".to_string(),
        property => {
            let label = if property == "cf" {
                format!("Custom field {name}")
            } else {
                attr_label(name).to_string()
            };
            let old = old.map(|x| resolve(name, x, lookups));
            let new = new.map(|x| resolve(name, x, lookups));
            match (old, new) {
                (Some(old), Some(new)) => format!("{label} changed from {old} to {new}"),
                (None, Some(new)) => format!("{label} set to {new}"),
                (Some(old), None) => format!("{label} deleted ({old})"),
                (None, None) => format!("{label} changed"),
            }
        }
    }
}

impl Issue {
    /// Render the issue report using a custom journal renderer.
    pub fn render_with<W, R>(&self, f: &mut W, width: usize, journals: &R) -> io::Result<()>
    where
        W: Write,
        R: JournalRender,
    {
        writeln!(f, "Issue #{} - {}", self.id, self.subject)?;
        writeln!(f)?;
        let created = &self.created_on;
        writeln!(
            f,
            "Reported by {} on {} {}",
            self.author,
            created.date(),
            created.time()
        )?;
        writeln!(f)?;

        writeln!(f, "Project: {}", self.project)?;
        writeln!(f, "Tracker: {}", self.tracker)?;
        writeln!(f, "Status: {}", self.status)?;
        writeln!(f, "Priority: {}", self.priority)?;

        if let Some(value) = &self.assigned_to {
            writeln!(f, "Assigned to: {value}")?;
        }
        if let Some(value) = &self.start_date {
            writeln!(f, "Start date: {value}")?;
        }
        if let Some(value) = &self.due_date {
            writeln!(f, "Due date: {value}")?;
        }
        if let Some(value) = &self.done {
            writeln!(f, "Done: {value}")?;
        }

        if let Some(description) = &self.description {
            writeln!(f)?;
            for line in wrap_flowed(description, width) {
                writeln!(f, "{line}")?;
            }
        }

        // render journals in order of occurrence
        for journal in &self.journals {
            journals.render_journal(f, journal, &self.lookups, width)?;
        }

        Ok(())
    }

    /// Lay out the issue as a table row filling the given width.
    ///
    /// Without an explicit width the terminal width is used. Columns are always output
    /// in the same order regardless of the order they're requested in.
    pub fn row(&self, columns: &[IssueColumn], width: Option<usize>) -> Row {
        let width = width.unwrap_or(*COLUMNS);
        let id = format!("{:>6} ", self.id);
        let mut remaining = width.saturating_sub(id.len());
        let mut fields = String::new();

        for column in IssueColumn::iter().filter(|c| columns.contains(c)) {
            remaining = remaining.saturating_sub(column.width());
            match column {
                IssueColumn::Project => {
                    fields.push_str(&fit(&self.project.name, 20));
                    fields.push_str("  ");
                }
                IssueColumn::Priority => {
                    fields.push_str(&fit(&self.priority.name, 8));
                    fields.push(' ');
                }
                IssueColumn::Status => {
                    fields.push_str(&fit(&self.status.name, 19));
                    fields.push(' ');
                }
                IssueColumn::DoneRatio => match self.done_ratio {
                    Some(value) => fields.push_str(&format!("{value:>3}% ")),
                    None => fields.push_str(&" ".repeat(5)),
                },
                IssueColumn::Assignee => {
                    let name = self.assigned_to.as_ref().map_or("", |x| x.name.as_str());
                    fields.push_str(&fit(name, 21));
                    fields.push(' ');
                }
            }
        }

        fields.push_str(&fit(&self.subject, remaining));
        Row { id, fields }
    }
}

impl Render for Issue {
    fn render<W: Write>(&self, f: &mut W, width: usize) -> io::Result<()> {
        self.render_with(f, width, &DefaultJournal)
    }
}

crate::impl_render_display!(Issue);

/// Optional columns for issue table rows.
#[derive(
    Display,
    EnumIter,
    EnumString,
    VariantNames,
    DeserializeFromStr,
    SerializeDisplay,
    Debug,
    Eq,
    PartialEq,
    Hash,
    Clone,
    Copy,
)]
#[strum(serialize_all = "kebab-case")]
pub enum IssueColumn {
    /// project name
    Project,
    /// issue priority
    Priority,
    /// issue status
    Status,
    /// completion percentage
    DoneRatio,
    /// person the issue is assigned to
    Assignee,
}

impl IssueColumn {
    /// Row width taken by the column including its separator.
    pub fn width(&self) -> usize {
        match self {
            Self::Project => 22,
            Self::Priority => 9,
            Self::Status => 20,
            Self::DoneRatio => 5,
            Self::Assignee => 22,
        }
    }
}

/// Single issue line for list output.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Row {
    id: String,
    fields: String,
}

impl Row {
    /// Write the row as a line, highlighting the identifier if requested.
    ///
    /// Escape sequences are written whenever color is enabled, regardless of whether the
    /// target is a terminal.
    pub fn render<W: Write>(&self, f: &mut W, color: bool) -> io::Result<()> {
        if color {
            writeln!(f, "{}{}", self.id.as_str().green(), self.fields)
        } else {
            writeln!(f, "{self}")
        }
    }
}

impl fmt::Display for Row {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}", self.id, self.fields)
    }
}

/// Output issues as table rows, one per line.
pub fn render_rows<'a, I, W>(
    f: &mut W,
    issues: I,
    columns: &[IssueColumn],
    width: Option<usize>,
    color: bool,
) -> io::Result<()>
where
    I: IntoIterator<Item = &'a Issue>,
    W: Write,
{
    for issue in issues {
        issue.row(columns, width).render(f, color)?;
    }
    Ok(())
}

/// Output status or priority entries, one per line.
pub fn render_statuses<'a, I, W>(f: &mut W, statuses: I) -> io::Result<()>
where
    I: IntoIterator<Item = &'a IssueStatus>,
    W: Write,
{
    for status in statuses {
        writeln!(f, "{status}")?;
    }
    Ok(())
}
