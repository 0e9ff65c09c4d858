/// melting point of aluminium and tasks loaded from files
pub mod melting_examples;
