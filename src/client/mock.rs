//! Scripted `ResourceApi` for unit tests.

use std::sync::Mutex;

use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use serde_json::Value;

use crate::coords::ResourceCoordinates;
use crate::error::ApiError;

use super::api::{ResourceApi, WatchEvent, WatchStream};

/// Records every call and replays a scripted event sequence on watch.
pub(crate) struct MockResourceApi {
    events: Mutex<Vec<WatchEvent>>,
    /// When true the stream stays pending after the scripted events,
    /// like a live subscription with nothing left to report.
    keep_stream_open: bool,
    create_error: Mutex<Option<ApiError>>,
    delete_error: Mutex<Option<ApiError>>,
    pub created: Mutex<Vec<(ResourceCoordinates, String, Value)>>,
    pub deleted: Mutex<Vec<(String, String, String)>>,
}

impl MockResourceApi {
    /// No events; the stream stays open until dropped.
    pub fn idle() -> Self {
        Self::scripted(Vec::new())
    }

    /// Replays `events`, then stays open.
    pub fn scripted(events: Vec<WatchEvent>) -> Self {
        Self {
            events: Mutex::new(events),
            keep_stream_open: true,
            create_error: Mutex::new(None),
            delete_error: Mutex::new(None),
            created: Mutex::new(Vec::new()),
            deleted: Mutex::new(Vec::new()),
        }
    }

    /// Replays `events`, then ends the stream.
    pub fn closing(events: Vec<WatchEvent>) -> Self {
        Self {
            keep_stream_open: false,
            ..Self::scripted(events)
        }
    }

    pub fn fail_create(self, error: ApiError) -> Self {
        *self.create_error.lock().unwrap() = Some(error);
        self
    }

    pub fn fail_delete(self, error: ApiError) -> Self {
        *self.delete_error.lock().unwrap() = Some(error);
        self
    }
}

#[async_trait]
impl ResourceApi for MockResourceApi {
    async fn create(
        &self,
        coordinates: &ResourceCoordinates,
        namespace: &str,
        document: Value,
    ) -> Result<Value, ApiError> {
        if let Some(error) = self.create_error.lock().unwrap().clone() {
            return Err(error);
        }
        self.created
            .lock()
            .unwrap()
            .push((coordinates.clone(), namespace.to_string(), document.clone()));
        Ok(document)
    }

    async fn watch(
        &self,
        _coordinates: &ResourceCoordinates,
        _namespace: &str,
        _name: &str,
    ) -> Result<WatchStream, ApiError> {
        let events: Vec<WatchEvent> = self.events.lock().unwrap().clone();
        let scripted = stream::iter(events);
        if self.keep_stream_open {
            Ok(scripted.chain(stream::pending()).boxed())
        } else {
            Ok(scripted.boxed())
        }
    }

    async fn delete(
        &self,
        coordinates: &ResourceCoordinates,
        namespace: &str,
        name: &str,
    ) -> Result<(), ApiError> {
        self.deleted.lock().unwrap().push((
            coordinates.resource.clone(),
            namespace.to_string(),
            name.to_string(),
        ));
        match self.delete_error.lock().unwrap().clone() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}
