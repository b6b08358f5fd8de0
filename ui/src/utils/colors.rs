//! Shared color constants for the UI.

use egui::Color32;

/// Success state of the submit button.
pub const COLOR_GREEN: Color32 = Color32::from_rgb(34, 197, 94);

/// Rejected files and failed requests.
pub const COLOR_RED: Color32 = Color32::from_rgb(220, 53, 69);

/// Accent used for the avatar and primary actions.
pub const COLOR_BLUE: Color32 = Color32::from_rgb(59, 130, 246);

/// Secondary text such as the character counter.
pub const COLOR_MUTED: Color32 = Color32::from_rgb(148, 163, 184);
