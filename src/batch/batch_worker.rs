use std::{num::NonZeroUsize, sync::Arc};

use anyhow::anyhow;
use log::{error, info};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::{
    api::client::SourceClient,
    message::LoadRequest,
    request::{MessageReceiver, RequestClient},
    settings::LoaderSettings,
};

use super::batch_executor;

const REJECTED_REQUEST_MESSAGE: &str = "Could not process request, please try again.";

enum BatchLoaderMessage {
    NewRequest(RequestClient),
}

#[derive(Clone)]
pub struct BatchLoaderHandle {
    sender: mpsc::Sender<BatchLoaderMessage>,
}

impl BatchLoaderHandle {
    /// Queues `request` and returns the receiver for its outbound messages.
    pub async fn load(&self, request: LoadRequest) -> MessageReceiver {
        let request_id = Uuid::new_v4();

        info!(
            "Adding request from the client to loader. [source = {}, key = {}, request_id = {request_id}]",
            request.source, request.key
        );
        let (receiver, client) = RequestClient::new(request, request_id);

        if let Err(err) = self.sender.send(BatchLoaderMessage::NewRequest(client)).await {
            error!("Error sending message to loader! [error = {err}, request_id = {request_id}]");

            match err.0 {
                BatchLoaderMessage::NewRequest(client) => {
                    client.handle.reply_with_error(REJECTED_REQUEST_MESSAGE);
                }
            }
        }

        receiver
    }
}

struct BatchLoader<TSourceClient: SourceClient> {
    source_client: Arc<TSourceClient>,
    batch_size: NonZeroUsize,
    receiver: mpsc::Receiver<BatchLoaderMessage>,
}

impl<TSourceClient: SourceClient> BatchLoader<TSourceClient> {
    fn handle_message(&mut self, message: BatchLoaderMessage) {
        match message {
            BatchLoaderMessage::NewRequest(client) => self.handle_new_request(client),
        }
    }

    fn handle_new_request(&mut self, client: RequestClient) {
        info!(
            "Accepted request from client. [request_id = {}]",
            client.handle.request_id
        );

        let source_client = Arc::clone(&self.source_client);
        let batch_size = self.batch_size;

        tokio::spawn(async move {
            batch_executor::execute_load(source_client, client, batch_size).await
        });
    }

    /// Answers everything still queued so no caller is left without a terminal message.
    async fn reject_pending(&mut self) {
        self.receiver.close();

        while let Some(BatchLoaderMessage::NewRequest(client)) = self.receiver.recv().await {
            info!(
                "Rejecting queued request, loader is stopping. [request_id = {}]",
                client.handle.request_id
            );
            client.handle.reply_with_error(REJECTED_REQUEST_MESSAGE);
        }
    }
}

pub fn start<TSourceClient: SourceClient>(
    source_client: Arc<TSourceClient>,
    loader_settings: &LoaderSettings,
    cancellation_token: CancellationToken,
) -> anyhow::Result<BatchLoaderHandle> {
    let batch_size = NonZeroUsize::new(loader_settings.batch_size)
        .ok_or_else(|| anyhow!("Batch size must be greater than zero."))?;
    let (sender, receiver) = mpsc::channel(loader_settings.queue_capacity.max(1));

    let loader = BatchLoader {
        source_client,
        batch_size,
        receiver,
    };

    tokio::spawn(async move { run_loader(loader, cancellation_token).await });

    Ok(BatchLoaderHandle { sender })
}

async fn run_loader<TSourceClient: SourceClient>(
    mut loader: BatchLoader<TSourceClient>,
    cancellation_token: CancellationToken,
) {
    loop {
        tokio::select! {
            biased;

            _ = cancellation_token.cancelled() => {
                info!("Stopping batch loader, requests in flight will run to completion.");
                loader.reject_pending().await;
                break;
            },
            msg = loader.receiver.recv() => {
                match msg {
                    Some(msg) => loader.handle_message(msg),
                    None => {
                        info!("Last sender was dropped, stopping batch loader.");
                        break;
                    }
                }
            },
        }
    }
}
