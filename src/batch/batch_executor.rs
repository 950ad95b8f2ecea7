use std::{num::NonZeroUsize, sync::Arc};

use log::{error, info};
use serde_json::Value;

use crate::{
    api::client::SourceClient,
    request::{ReplyHandle, RequestClient},
};

use super::batch_plan;

/// Runs one load request to its terminal message.
///
/// Failures never escape: they become the single `Error` reply.
pub async fn execute_load<TSourceClient: SourceClient>(
    source_client: Arc<TSourceClient>,
    request_client: RequestClient,
    batch_size: NonZeroUsize,
) {
    let RequestClient { source, handle } = request_client;

    match source_client.fetch_items(&source).await {
        Ok(items) => distribute_items(items, batch_size, handle),

        Err(err) => {
            error!(
                "Loading source failed. [request_id = {}, source = {source}, error = {err}]",
                handle.request_id
            );
            handle.reply_with_error(err);
        }
    }
}

fn distribute_items(items: Vec<Value>, batch_size: NonZeroUsize, handle: ReplyHandle) {
    let total_items = items.len();
    let batches = batch_plan::split_into_batches(items, batch_size);
    let batch_count = batches.len();

    for (batch_index, batch) in batches.into_iter().enumerate() {
        let progress = batch_plan::progress_for(batch_index, batch_count, batch_size, total_items);

        if !handle.reply_with_batch(batch, progress) {
            return;
        }
    }

    info!(
        "Source loaded. [request_id = {}, total_items = {total_items}, batch_count = {batch_count}]",
        handle.request_id
    );
    handle.reply_with_completion(total_items);
}
