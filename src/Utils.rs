/// loading and saving melting tasks
pub mod load_from_file;
