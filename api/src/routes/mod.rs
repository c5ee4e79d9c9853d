pub mod gen_code;
pub mod health;
pub mod query;
pub mod reload_corpus;

#[cfg(test)]
pub(crate) mod test_support;
