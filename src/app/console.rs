//! Console display surfaces for the demo binary
//!
//! Each surface prints the full state it is handed, one block per delivery.

use colored::{ColoredString, Colorize};
use crate::notifications::{ButtonVariant, Dialog, DisplaySurface, Toast, ToastKind};

fn paint_kind(kind: ToastKind, text: &str) -> ColoredString {
    match kind {
        ToastKind::Success => text.green(),
        ToastKind::Info => text.blue(),
        ToastKind::Error => text.red(),
    }
}

/// Single toast line: glyph, kind and title
pub fn format_toast(toast: &Toast) -> String {
    let label = format!("{} {}", toast.kind().icon().glyph(), toast.kind());
    format!("{} {} ({})", paint_kind(toast.kind(), &label), toast.title(), toast.id())
}

/// Dialog block: icon and title line, description, then the buttons
pub fn format_dialog(dialog: &Dialog) -> String {
    let mut lines = Vec::new();

    let icon = dialog.icon().map(|icon| icon.glyph()).unwrap_or(" ");
    let title = dialog.title().unwrap_or_default();
    lines.push(format!("{} {}", icon, title.bold()));

    if let Some(description) = dialog.description() {
        lines.push(format!("  {}", description));
    }

    if !dialog.buttons().is_empty() {
        let buttons: Vec<String> = dialog
            .buttons()
            .iter()
            .map(|button| {
                let label = if button.is_loading() {
                    format!("[{}...]", button.label())
                } else {
                    format!("[{}]", button.label())
                };
                match button.variant() {
                    ButtonVariant::Primary => label.bold().to_string(),
                    ButtonVariant::Secondary => label,
                    ButtonVariant::Outline => label.dimmed().to_string(),
                }
            })
            .collect();
        lines.push(format!("  {}", buttons.join(" ")));
    }

    lines.join("\n")
}

/// Prints the toast stack on every delivery
#[derive(Debug, Default)]
pub struct ConsoleToastSurface;

impl DisplaySurface<[Toast]> for ConsoleToastSurface {
    fn render(&self, toasts: &[Toast]) {
        if toasts.is_empty() {
            println!("{}", "toasts: (none)".dimmed());
            return;
        }
        println!("{}", "toasts:".bold());
        for toast in toasts {
            println!("  {}", format_toast(toast));
        }
    }
}

/// Prints the active dialog on every delivery
#[derive(Debug, Default)]
pub struct ConsoleDialogSurface;

impl DisplaySurface<Option<Dialog>> for ConsoleDialogSurface {
    fn render(&self, dialog: &Option<Dialog>) {
        match dialog {
            Some(dialog) => println!("{}\n{}", "dialog:".bold(), format_dialog(dialog)),
            None => println!("{}", "dialog: (closed)".dimmed()),
        }
    }
}

/// Prints sheet open/close transitions
#[derive(Debug, Default)]
pub struct ConsoleSheetSurface;

impl DisplaySurface<bool> for ConsoleSheetSurface {
    fn render(&self, open: &bool) {
        println!("{} {}", "sheet:".bold(), if *open { "open" } else { "closed" });
    }
}
