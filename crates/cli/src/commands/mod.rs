pub(crate) mod browse;
pub(crate) mod edit;
