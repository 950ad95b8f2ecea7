pub mod batch_executor;
pub mod batch_plan;
pub mod batch_worker;

#[cfg(test)]
pub(crate) mod static_source_client;
