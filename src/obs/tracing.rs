// self
use crate::{_prelude::*, obs::OperationKind};

/// Handler future wrapped in its operation span when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedOperation<F> = tracing::instrument::Instrumented<F>;
/// Handler future left untouched when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedOperation<F> = F;

/// `oauth2_accesstoken.operation` span opened around one backend handler.
///
/// Carries the handler (`operation`), its call site (`stage`) and, for per-client handlers, the
/// client name (`client`). Client secrets and tokens are never recorded.
#[derive(Clone, Debug)]
pub struct OperationSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl OperationSpan {
	/// Opens the span for `kind`; `client` is set for handlers addressing one configuration.
	pub fn new(kind: OperationKind, stage: &'static str, client: Option<&str>) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!(
				"oauth2_accesstoken.operation",
				operation = kind.as_str(),
				stage,
				client = tracing::field::Empty,
			);

			if let Some(client) = client {
				span.record("client", client);
			}

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (kind, stage, client);

			Self {}
		}
	}

	/// Runs a handler inside the span without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedOperation<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}
}
