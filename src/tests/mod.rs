use super::*;

pub(crate) fn opts() -> Options {
    Options::default()
}

pub(crate) fn skip_opts() -> Options {
    Options {
        skip_initial_validation: true,
        ..Options::default()
    }
}

pub(crate) fn strict_opts() -> Options {
    Options {
        strict: true,
        skip_initial_validation: true,
        ..Options::default()
    }
}

pub(crate) fn repaired(input: &str) -> String {
    crate::repair(input, &opts()).unwrap()
}

pub(crate) fn as_json(input: &str) -> serde_json::Value {
    serde_json::from_str(&repaired(input)).unwrap()
}

// Submodules (topic-based)
mod arrays;
mod properties;
mod scenarios;
mod strings_escapes;
