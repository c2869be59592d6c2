use chrono::{DateTime, Utc};
use colored::Colorize;
use sidenotes::cache::Response;
use sidenotes::model::{Note, StorageInfo};
use timeago::Formatter;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const LINE_WIDTH: usize = 100;
const TIME_WIDTH: usize = 16;
const PREVIEW_CHARS: usize = 60;

pub(super) fn print_success(message: &str) {
    println!("{}", message.green());
}

pub(super) fn print_warning(message: &str) {
    eprintln!("{}", message.yellow());
}

pub(super) fn print_notes(notes: &[Note]) {
    if notes.is_empty() {
        println!("No notes found.");
        return;
    }
    let id_width = notes.iter().map(|n| n.id.width()).max().unwrap_or(0);
    for note in notes {
        println!("{}", note_line(note, id_width));
    }
}

fn note_line(note: &Note, id_width: usize) -> String {
    let id = format!("{:<width$}  ", note.id, width = id_width);
    let tags = note
        .tags
        .iter()
        .map(|t| format!("#{t}"))
        .collect::<Vec<_>>()
        .join(" ");
    let tags = if tags.is_empty() { tags } else { format!(" {tags}") };

    let preview: String = note
        .content
        .chars()
        .take(PREVIEW_CHARS)
        .map(|c| if c == '\n' { ' ' } else { c })
        .collect();
    let title_content = if preview.is_empty() {
        note.title.clone()
    } else {
        format!("{} {}", note.title, preview.trim())
    };

    let fixed = id.width() + tags.width() + TIME_WIDTH;
    let available = LINE_WIDTH.saturating_sub(fixed);
    let body = truncate_to_width(&title_content, available);
    let padding = available.saturating_sub(body.width());

    format!(
        "{}{}{}{}{}",
        id.yellow(),
        body,
        tags.cyan(),
        " ".repeat(padding),
        format_time_ago(note.updated_at).dimmed()
    )
}

pub(super) fn print_full_note(note: &Note) {
    println!("{} {}", note.id.yellow(), note.title.bold());
    let mut meta = format!(
        "created {}  updated {}",
        note.created_at.format("%Y-%m-%d %H:%M"),
        note.updated_at.format("%Y-%m-%d %H:%M")
    );
    if !note.tags.is_empty() {
        meta.push_str("  ");
        meta.push_str(&note.tags.iter().map(|t| format!("#{t}")).collect::<Vec<_>>().join(" "));
    }
    println!("{}", meta.dimmed());
    println!("--------------------------------");
    println!("{}", note.content);
}

pub(super) fn print_tags(tags: &[String]) {
    if tags.is_empty() {
        println!("No tags yet.");
        return;
    }
    for tag in tags {
        println!("{}", format!("#{tag}").cyan());
    }
}

pub(super) fn print_info(info: &StorageInfo) {
    println!("{:<14}{}", "Notes:", info.note_count);
    println!(
        "{:<14}{} ({} bytes)",
        "Storage used:", info.human_readable_size, info.storage_size
    );
    match info.last_updated {
        Some(at) => println!("{:<14}{}", "Last updated:", at.format("%Y-%m-%d %H:%M:%S UTC")),
        None => println!("{:<14}{}", "Last updated:", "never".dimmed()),
    }
}

pub(super) fn print_response(response: &Response) {
    let status = format!("{} {}", response.status.as_u16(), response.status_text());
    if response.is_success() {
        println!("{}", status.green());
    } else {
        println!("{}", status.red());
    }
    for (name, value) in &response.headers {
        println!("{}: {}", name.as_str().dimmed(), value.to_str().unwrap_or("<binary>"));
    }
    println!();
    println!("{}", response.text());
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    let mut result = String::new();
    let mut current_width = 0;
    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > max_width.saturating_sub(1) {
            result.push('…');
            return result;
        }
        result.push(c);
        current_width += char_width;
    }
    result
}

fn format_time_ago(timestamp: DateTime<Utc>) -> String {
    let duration = Utc::now().signed_duration_since(timestamp);
    let time_str = Formatter::new().convert(duration.to_std().unwrap_or_default());
    format!("{:>width$}", time_str, width = TIME_WIDTH)
}
