//! Synthetic updates used while the session is in mock mode

use crate::message::{UpdateEnvelope, UpdateEvent};
use bridge_traits::Clock;
use chrono::SecondsFormat;
use rand::Rng;

/// Draws one catalogue update with the given probability.
pub(crate) fn draw(probability: f64, clock: &dyn Clock) -> Option<UpdateEnvelope> {
    let mut rng = rand::thread_rng();
    if rng.gen::<f64>() >= probability {
        return None;
    }

    let event = if rng.gen_bool(0.5) {
        UpdateEvent::Notification {
            message: Some("System update: All services are running normally".to_string()),
            user_id: None,
            broadcast: true,
        }
    } else {
        UpdateEvent::ConnectionEstablished
    };

    Some(UpdateEnvelope {
        event,
        timestamp: Some(clock.now().to_rfc3339_opts(SecondsFormat::Millis, true)),
        user_id: None,
    })
}
