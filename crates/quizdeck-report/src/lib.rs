//! quizdeck-report: Export of finished quizzes.

pub mod html;

pub use html::{generate_html, write_html_report};
