//! Alloy transport layer that logs every JSON-RPC request passing through it
//! together with how long the node took to answer. The configured label is
//! attached to each log line so the origin of a request is visible when
//! several providers share one log stream.
use {
    alloy::{
        rpc::json_rpc::{RequestPacket, ResponsePacket},
        transports::TransportError,
    },
    std::{
        fmt::Debug,
        pin::Pin,
        task::{Context, Poll},
        time::Instant,
    },
    tower::{Layer, Service},
};

/// Layer that logs each request with its label and latency.
pub(crate) struct InstrumentationLayer {
    pub label: String,
}

impl<S> Layer<S> for InstrumentationLayer {
    type Service = InstrumentedProvider<S>;

    fn layer(&self, inner: S) -> Self::Service {
        InstrumentedProvider {
            inner,
            label: self.label.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct InstrumentedProvider<S> {
    inner: S,
    label: String,
}

impl<S> Service<RequestPacket> for InstrumentedProvider<S>
where
    S: Service<RequestPacket, Response = ResponsePacket, Error = TransportError>,
    S::Future: Send + 'static,
    S::Response: Send + 'static + Debug,
    S::Error: Send + 'static + Debug,
{
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;
    type Response = S::Response;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: RequestPacket) -> Self::Future {
        let methods: Vec<String> = req
            .requests_mut()
            .iter_mut()
            .map(|r| {
                tracing::trace!(component = %self.label, ?r, "executing request");
                r.method().to_string()
            })
            .collect();

        if methods.len() > 1 {
            tracing::trace!(len = methods.len(), "executing batch request");
        }

        let label = self.label.clone();
        let start = Instant::now();
        let fut = self.inner.call(req);
        Box::pin(async move {
            let res = fut.await;
            match &res {
                Ok(_) => tracing::trace!(
                    component = %label,
                    ?methods,
                    elapsed = ?start.elapsed(),
                    "request finished"
                ),
                Err(err) => tracing::debug!(
                    component = %label,
                    ?methods,
                    elapsed = ?start.elapsed(),
                    ?err,
                    "request failed"
                ),
            }
            res
        })
    }
}
