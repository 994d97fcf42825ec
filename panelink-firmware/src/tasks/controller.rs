//! Main controller task
//!
//! Owns the [`Controller`] and feeds it panel payloads, backend messages
//! and tick signals. Frames released by the scheduler go to the panel TX
//! task; follow-up subscriptions go to the bridge.

use alloc::string::String;

use defmt::*;
use embassy_futures::select::{select3, Either3};

use panelink_core::link::{BackendMessage, ControllerMessage};
use panelink_core::{Controller, LovelaceRenderer};

use crate::backend::ChannelBackend;
use crate::channels::{BACKEND_MESSAGES, LINK_OUTBOX, PANEL_FRAMES, PANEL_PAYLOADS};
use crate::config::PanelSetup;
use crate::tasks::tick::{now_ms, TICK_SIGNAL};

/// Controller task - main coordination loop
#[embassy_executor::task]
pub async fn controller_task(setup: PanelSetup) {
    info!("Controller task started");

    let PanelSetup {
        config,
        entities,
        pages,
    } = setup;
    let mut controller = Controller::new(config, entities, pages, ChannelBackend, LovelaceRenderer);

    let stats = controller.stats();
    info!(
        "Loaded {} pages, {} stateful items, {} entities",
        stats.pages, stats.stateful_items, stats.entities
    );

    for (entity_id, attributes) in controller.subscriptions() {
        subscribe(entity_id, attributes).await;
    }

    controller.start();

    loop {
        match select3(
            PANEL_PAYLOADS.receive(),
            BACKEND_MESSAGES.receive(),
            TICK_SIGNAL.wait(),
        )
        .await
        {
            Either3::First(payload) => {
                controller.handle_payload(&payload, now_ms());
            }
            Either3::Second(message) => {
                handle_backend_message(&mut controller, message).await;
            }
            Either3::Third(now) => {
                if let Some(frame) = controller.tick(now) {
                    PANEL_FRAMES.send(frame).await;
                }
            }
        }
    }
}

async fn handle_backend_message(
    controller: &mut Controller<ChannelBackend, LovelaceRenderer>,
    message: BackendMessage,
) {
    match message {
        BackendMessage::EntityUpdate {
            entity_id,
            attribute,
            value,
        } => {
            let follow_ups = controller.on_update(&entity_id, &attribute, &value, now_ms());
            if !follow_ups.is_empty() {
                subscribe(&entity_id, follow_ups).await;
            }
        }
        BackendMessage::TimeSync { epoch_seconds } => {
            controller.sync_time(epoch_seconds, now_ms());
        }
    }
}

async fn subscribe(entity_id: &str, attributes: &[&str]) {
    for attribute in attributes {
        LINK_OUTBOX
            .send(ControllerMessage::Subscribe {
                entity_id: String::from(entity_id),
                attribute: String::from(*attribute),
            })
            .await;
    }
}
