//! Live-reload signalling between build tasks and connected browsers.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Messages pushed to connected clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ReloadMessage {
    /// Connection established.
    Connected,

    /// Full page reload.
    Reload,

    /// Refresh one stylesheet in place.
    UpdateStyles {
        /// Href of the stylesheet, relative to the site root.
        href: String,
    },
}

/// Hub broadcasting reload messages to every connected client.
///
/// Cloning the hub shares the underlying channel, so tasks and the server
/// can hold their own handles.
#[derive(Debug, Clone)]
pub struct ReloadHub {
    sender: broadcast::Sender<ReloadMessage>,
}

impl ReloadHub {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(100);
        Self { sender }
    }

    /// Send a message to all connected clients.
    pub fn send(&self, msg: ReloadMessage) {
        // Ignore send errors (no receivers)
        let _ = self.sender.send(msg);
    }

    /// Subscribe to reload messages.
    pub fn subscribe(&self) -> broadcast::Receiver<ReloadMessage> {
        self.sender.subscribe()
    }

    /// Number of connected subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for ReloadHub {
    fn default() -> Self {
        Self::new()
    }
}

/// Generate the client-side reload script.
///
/// Served at `/__reload.js` and injected into every HTML page the dev server
/// returns. Connects back to the serving host, so no address is baked in.
pub fn reload_client_script() -> String {
    r#"
(function() {
  'use strict';

  const ws = new WebSocket('ws://' + location.host + '/__reload');

  ws.onopen = function() {
    console.log('[reload] Connected');
  };

  ws.onmessage = function(event) {
    const msg = JSON.parse(event.data);

    switch (msg.type) {
      case 'reload':
        location.reload();
        break;

      case 'update_styles':
        document.querySelectorAll('link[rel="stylesheet"]').forEach(function(link) {
          const href = link.getAttribute('href').split('?')[0];
          if (href === msg.href) {
            link.setAttribute('href', href + '?t=' + Date.now());
          }
        });
        break;

      case 'connected':
        console.log('[reload] Server acknowledged connection');
        break;
    }
  };

  ws.onclose = function() {
    console.log('[reload] Disconnected');
    setTimeout(function() {
      location.reload();
    }, 1000);
  };
})();
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hub_broadcasts_messages() {
        let hub = ReloadHub::new();
        let mut rx = hub.subscribe();

        hub.send(ReloadMessage::Reload);

        match rx.try_recv() {
            Ok(ReloadMessage::Reload) => {}
            _ => panic!("Expected Reload message"),
        }
    }

    #[test]
    fn send_without_subscribers_is_a_noop() {
        let hub = ReloadHub::new();
        assert_eq!(hub.subscriber_count(), 0);

        hub.send(ReloadMessage::Reload);
    }

    #[test]
    fn serializes_messages() {
        let msg = ReloadMessage::UpdateStyles {
            href: "/css/main.css".to_string(),
        };

        let json = serde_json::to_string(&msg).unwrap();

        assert!(json.contains("update_styles"));
        assert!(json.contains("/css/main.css"));
    }

    #[test]
    fn client_script_targets_the_serving_host() {
        let script = reload_client_script();

        assert!(script.contains("location.host"));
        assert!(script.contains("/__reload"));
    }
}
