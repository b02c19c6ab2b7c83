use crate::engine::slot;
use crate::json::JsonUpdateKind;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio::sync::oneshot;

pub type Requester = mpsc::Sender<(RequestKind, Responder)>;
pub type RequestListener = mpsc::Receiver<(RequestKind, Responder)>;
pub type Responder = oneshot::Sender<ResponseKind>;
pub type ResponseListener = oneshot::Receiver<ResponseKind>;
pub type ResponseCallback = Box<dyn FnOnce(JsonUpdateKind) + 'static + Send + Sync>;

pub fn create_request_channel(buffer: usize) -> (Requester, RequestListener) {
    mpsc::channel(buffer)
}

pub fn create_response_channel() -> (Responder, ResponseListener) {
    oneshot::channel()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RequestKind {
    SlotRequest { id: usize, kind: slot::RequestKind },
    AddSlot { name: String },
    RemoveSlot { id: usize },
    CloneSlot { id: usize },
    MoveSlot { id: usize, new_id: usize },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ResponseKind {
    InvalidId,
    Failed,
    Ok,
    SlotResponse {
        id: usize,
        kind: JsonUpdateKind,
    },
    AddSlot {
        id: usize,
        instance: serde_json::Value,
    },
}

pub async fn send_request(req_tx: &Requester, req: RequestKind) -> Option<ResponseKind> {
    let (res_tx, res_rx) = create_response_channel();

    if let Ok(()) = req_tx.send((req, res_tx)).await {
        if let Ok(response_kind) = res_rx.await {
            Some(response_kind)
        } else {
            None
        }
    } else {
        None
    }
}
