use serde_json::json;
use tracing::error;

use crate::{
    deser::{DeserializationError, DeserializationResult, SerializationResult},
    midi::{self, Event},
};

pub mod command;
pub mod slot;

use command::{RequestKind, RequestListener, Responder, ResponseKind};
pub use slot::Slot;

pub struct Engine {
    slots: Vec<Slot>,
    req_rx: RequestListener,
    midi_rx: midi::Receiver,
    pending: Vec<Event>,
    block: Vec<Event>,
}

impl Engine {
    pub fn new(midi_rx: midi::Receiver, req_rx: RequestListener) -> Self {
        Self {
            slots: Default::default(),
            req_rx,
            midi_rx,
            pending: Default::default(),
            block: Default::default(),
        }
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn add_slot(&mut self, slot: Slot) {
        self.slots.push(slot);
    }

    pub fn update(&mut self) {
        self.receive_requests();
        self.receive_midi_messages();
    }

    // Live messages have no block position yet; they are stamped at block
    // start and processed ahead of the host-supplied events.
    pub fn process_block(&mut self, input: &[Event]) {
        self.block.clear();
        self.block.append(&mut self.pending);
        self.block.extend_from_slice(input);
        let block = &self.block;
        for slot in &mut self.slots {
            slot.process_block(block);
        }
    }

    pub fn slot_output(&self, id: usize) -> Option<&[Event]> {
        self.slots.get(id).map(|slot| slot.output())
    }

    pub fn reset_all(&mut self) {
        for slot in &mut self.slots {
            slot.reset();
        }
    }

    pub fn receive_requests(&mut self) {
        while let Ok((kind, responder)) = self.req_rx.try_recv() {
            self.process_request(kind, responder);
        }
    }

    fn receive_midi_messages(&mut self) {
        while let Ok(message) = self.midi_rx.try_recv() {
            self.pending.push(Event::new(0, message));
        }
    }

    fn process_request(&mut self, kind: RequestKind, responder: Responder) {
        match kind {
            RequestKind::SlotRequest { id, kind } => self.process_slot_request(responder, id, kind),
            RequestKind::AddSlot { name } => self.process_add_slot(responder, name),
            RequestKind::RemoveSlot { id } => self.process_remove_slot(responder, id),
            RequestKind::CloneSlot { id } => self.process_clone_slot(responder, id),
            RequestKind::MoveSlot { id, new_id } => self.process_move_slot(responder, id, new_id),
        }
    }

    fn process_slot_request(&mut self, responder: Responder, id: usize, kind: slot::RequestKind) {
        if id >= self.slots.len() {
            respond(responder, ResponseKind::InvalidId);
        } else {
            let cb = move |kind| respond(responder, ResponseKind::SlotResponse { id, kind });
            self.slots[id].process_request(kind, Box::new(cb));
        }
    }

    fn process_add_slot(&mut self, responder: Responder, name: String) {
        let slot = Slot::with_name(&name);
        if let Ok(instance) = slot.serialize() {
            self.add_slot(slot);
            respond(responder, ResponseKind::AddSlot {
                id: self.slots.len() - 1,
                instance,
            });
        } else {
            respond(responder, ResponseKind::Failed);
        }
    }

    fn process_remove_slot(&mut self, responder: Responder, id: usize) {
        if id >= self.slots.len() {
            respond(responder, ResponseKind::InvalidId);
        } else {
            self.slots.remove(id);
            respond(responder, ResponseKind::Ok);
        }
    }

    fn process_clone_slot(&mut self, responder: Responder, id: usize) {
        if id >= self.slots.len() {
            respond(responder, ResponseKind::InvalidId);
        } else {
            let slot = self.slots[id].clone_slot();
            self.add_slot(slot);
            respond(responder, ResponseKind::Ok);
        }
    }

    fn process_move_slot(&mut self, responder: Responder, id: usize, new_id: usize) {
        if id >= self.slots.len() || new_id >= self.slots.len() {
            respond(responder, ResponseKind::InvalidId);
        } else {
            let slot = self.slots.remove(id);
            self.slots.insert(new_id, slot);
            respond(responder, ResponseKind::Ok);
        }
    }

    pub fn serialize(&self) -> SerializationResult {
        let mut slots = Vec::with_capacity(self.slots.len());
        for slot in &self.slots {
            slots.push(slot.serialize()?);
        }
        Ok(json!({ "slots": slots }))
    }

    pub fn deserialize(&mut self, source: &serde_json::Value) -> DeserializationResult {
        let slots = source
            .get("slots")
            .and_then(|v| v.as_array())
            .ok_or(DeserializationError)?;
        self.slots.clear();
        for value in slots {
            let mut slot = Slot::default();
            slot.deserialize(value)?;
            self.add_slot(slot);
        }
        Ok(())
    }
}

fn respond(responder: Responder, response_kind: ResponseKind) {
    if let Err(e) = responder.send(response_kind) {
        error!("Failed to send a response: {e:?}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::config::UpdateKind;
    use crate::json::JsonUpdateKind;
    use crate::midi::Message;

    async fn request(
        engine: &mut Engine,
        req_tx: &command::Requester,
        kind: RequestKind,
    ) -> ResponseKind {
        let req_tx = req_tx.clone();
        let handle = tokio::spawn(async move { command::send_request(&req_tx, kind).await });
        // Let the spawned task send before the engine drains its listener.
        tokio::task::yield_now().await;
        engine.update();
        handle.await.unwrap().unwrap()
    }

    #[tokio::test]
    async fn add_and_filter_through_slot() {
        let (_midi_tx, midi_rx) = midi::create_channel(32);
        let (req_tx, req_rx) = command::create_request_channel(32);
        let mut engine = Engine::new(midi_rx, req_rx);

        let res = request(&mut engine, &req_tx, RequestKind::AddSlot {
            name: "Direct".into(),
        })
        .await;
        assert!(matches!(res, ResponseKind::AddSlot { id: 0, .. }));

        let res = request(&mut engine, &req_tx, RequestKind::SlotRequest {
            id: 0,
            kind: slot::RequestKind::UpdateFilter(UpdateKind::IgnoreNoteOn(true)),
        })
        .await;
        assert!(matches!(
            res,
            ResponseKind::SlotResponse {
                id: 0,
                kind: JsonUpdateKind::UpdateFields(_),
            }
        ));

        engine.process_block(&[
            Event::new(0, Message::note_on(0, 60, 100)),
            Event::new(1, Message::note_off(0, 62, 0)),
        ]);
        assert_eq!(engine.slot_output(0).unwrap(), &[Event::new(
            1,
            Message::note_off(0, 62, 0),
        )]);
        assert_eq!(engine.slot_output(1), None);
    }

    #[tokio::test]
    async fn invalid_slot_ids_are_rejected() {
        let (_midi_tx, midi_rx) = midi::create_channel(32);
        let (req_tx, req_rx) = command::create_request_channel(32);
        let mut engine = Engine::new(midi_rx, req_rx);

        let res = request(&mut engine, &req_tx, RequestKind::RemoveSlot { id: 0 }).await;
        assert_eq!(res, ResponseKind::InvalidId);

        let res = request(&mut engine, &req_tx, RequestKind::SlotRequest {
            id: 3,
            kind: slot::RequestKind::Reset,
        })
        .await;
        assert_eq!(res, ResponseKind::InvalidId);
    }

    #[tokio::test]
    async fn live_messages_are_processed_ahead_of_host_input() {
        let (midi_tx, midi_rx) = midi::create_channel(32);
        let (req_tx, req_rx) = command::create_request_channel(32);
        let mut engine = Engine::new(midi_rx, req_rx);
        request(&mut engine, &req_tx, RequestKind::AddSlot {
            name: "Live".into(),
        })
        .await;

        midi_tx.send(Message::note_on(0, 60, 100)).unwrap();
        engine.update();
        engine.process_block(&[Event::new(4, Message::note_on(0, 64, 90))]);

        assert_eq!(engine.slot_output(0).unwrap(), &[
            Event::new(0, Message::note_on(0, 60, 100)),
            Event::new(4, Message::note_on(0, 64, 90)),
        ]);

        // Pending events are consumed by the block that processed them.
        engine.process_block(&[]);
        assert!(engine.slot_output(0).unwrap().is_empty());
    }

    #[tokio::test]
    async fn slot_management_requests() {
        let (_midi_tx, midi_rx) = midi::create_channel(32);
        let (req_tx, req_rx) = command::create_request_channel(32);
        let mut engine = Engine::new(midi_rx, req_rx);

        for name in ["A", "B"] {
            request(&mut engine, &req_tx, RequestKind::AddSlot { name: name.into() }).await;
        }
        let res = request(&mut engine, &req_tx, RequestKind::CloneSlot { id: 1 }).await;
        assert_eq!(res, ResponseKind::Ok);
        assert_eq!(
            engine.slots().iter().map(Slot::name).collect::<Vec<_>>(),
            vec!["A", "B", "B"]
        );

        let res = request(&mut engine, &req_tx, RequestKind::MoveSlot { id: 2, new_id: 0 }).await;
        assert_eq!(res, ResponseKind::Ok);
        assert_eq!(
            engine.slots().iter().map(Slot::name).collect::<Vec<_>>(),
            vec!["B", "A", "B"]
        );

        let res = request(&mut engine, &req_tx, RequestKind::RemoveSlot { id: 1 }).await;
        assert_eq!(res, ResponseKind::Ok);
        assert_eq!(
            engine.slots().iter().map(Slot::name).collect::<Vec<_>>(),
            vec!["B", "B"]
        );
    }

    #[tokio::test]
    async fn serialize_roundtrip() {
        let (_midi_tx, midi_rx) = midi::create_channel(32);
        let (req_tx, req_rx) = command::create_request_channel(32);
        let mut engine = Engine::new(midi_rx, req_rx);
        request(&mut engine, &req_tx, RequestKind::AddSlot {
            name: "Direct".into(),
        })
        .await;
        request(&mut engine, &req_tx, RequestKind::SlotRequest {
            id: 0,
            kind: slot::RequestKind::UpdateFilter(UpdateKind::ToggleNoteMessages(true)),
        })
        .await;

        let value = engine.serialize().unwrap();

        let (_midi_tx2, midi_rx2) = midi::create_channel(32);
        let (_req_tx2, req_rx2) = command::create_request_channel(32);
        let mut restored = Engine::new(midi_rx2, req_rx2);
        restored.deserialize(&value).unwrap();

        assert_eq!(restored.slots().len(), 1);
        assert_eq!(restored.slots()[0].name(), "Direct");
        assert!(restored.slots()[0].config().load().toggle_note_messages);
    }
}
