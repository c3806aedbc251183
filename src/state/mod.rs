/// State management module
///
/// This module handles all application state:
/// - The select / convert / result cycle of the converter window (session.rs)

pub mod session;
