use std::{future::Future, pin::Pin, sync::Arc};

use crate::events::{EventHandler, EventProducer, Handler, NotificationAcceptedEvent};

#[derive(Default, Clone)]
pub struct EventProducers {
    pub notification_accepted_producer: Vec<EventProducer<NotificationAcceptedEvent>>,
}

pub struct EventHandlers {
    pub on_notification_accepted: Option<EventHandler<NotificationAcceptedEvent>>,
}

impl EventHandlers {
    pub fn new(buffer_size: usize, hooks: EventHooks) -> Self {
        let on_notification_accepted = hooks.on_notification_accepted.map(|f| EventHandler::new(buffer_size, f));
        Self { on_notification_accepted }
    }

    pub fn producers(&self) -> EventProducers {
        let mut result = EventProducers::default();
        if let Some(handler) = &self.on_notification_accepted {
            result.notification_accepted_producer.push(handler.subscribe());
        }
        result
    }

    pub async fn start_handlers(self) {
        if let Some(handler) = self.on_notification_accepted {
            tokio::spawn(async move {
                handler.start_handler().await;
            });
        }
    }
}

#[derive(Default, Clone)]
pub struct EventHooks {
    pub on_notification_accepted: Option<Handler<NotificationAcceptedEvent>>,
}

impl EventHooks {
    pub fn on_notification_accepted<F>(&mut self, f: F) -> &mut Self
    where F: (Fn(NotificationAcceptedEvent) -> Pin<Box<dyn Future<Output = ()> + Send>>) + Send + Sync + 'static {
        self.on_notification_accepted = Some(Arc::new(f));
        self
    }
}
