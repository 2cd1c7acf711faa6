use clap::{ArgMatches};

pub struct Options<'o, 'a> {
    args: &'o ArgMatches<'a>,
}

impl<'o, 'a> Options<'o, 'a> {

    pub fn new(args: &'o ArgMatches<'a>) -> Self {
        Self { args }
    }

    pub fn flag(&'a self, key: &str) -> bool {
        self.args.is_present(key)
    }

    pub fn get(&'a self, key: &str) -> &'a str {
        self.args.value_of(key)
            .expect("bug: missing argument value")
    }

    pub fn vec(&'a self, key: &str) -> Vec<&'a str> {
        self.args.values_of(key)
            .expect("bug: missing argument value")
            .collect()
    }

    pub fn opt(&'a self, key: &str) -> Option<&'a str> {
        self.args.value_of(key)
    }
}
