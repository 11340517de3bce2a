//! Structured-generation port.
//!
//! The raw port returns an untyped JSON value; [`generate_structured`] is
//! the single place that value is checked against the declared schema.
//! Callers receive either a payload satisfying their type or a typed
//! [`GenerationError`] - never a shape to sniff.

use async_trait::async_trait;
use schemars::schema::RootSchema;
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Errors from the generation capability
#[derive(Debug, Clone, thiserror::Error)]
pub enum GenerationError {
    /// The provider failed (network, quota, refusal)
    #[error("generation provider failed: {0}")]
    Provider(String),

    /// The call exceeded its time bound
    #[error("generation timed out after {duration_secs}s")]
    Timeout { duration_secs: u64 },

    /// The returned value did not satisfy the declared schema
    #[error("generated value does not match schema {schema}: {detail}")]
    SchemaMismatch { schema: String, detail: String },
}

/// One structured-generation request
#[derive(Debug, Clone)]
pub struct GenerateRequest {
    /// User prompt
    pub prompt: String,
    /// Optional system prompt
    pub system_prompt: Option<String>,
    /// Declared output schema the value must satisfy
    pub schema: RootSchema,
}

impl GenerateRequest {
    /// Build a request declaring `T` as the output schema
    #[must_use]
    pub fn new<T: JsonSchema>(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            system_prompt: None,
            schema: schemars::schema_for!(T),
        }
    }

    /// With a system prompt
    #[must_use]
    pub fn with_system_prompt(mut self, system: impl Into<String>) -> Self {
        self.system_prompt = Some(system.into());
        self
    }

    /// Title of the declared schema, if any
    #[must_use]
    pub fn schema_title(&self) -> Option<&str> {
        self.schema
            .schema
            .metadata
            .as_ref()
            .and_then(|m| m.title.as_deref())
    }
}

/// Schema-bound LLM generation capability
#[async_trait]
pub trait StructuredGenerator: Send + Sync {
    /// Generate a value intended to satisfy `request.schema`.
    ///
    /// # Errors
    /// Returns [`GenerationError`] when the provider fails or times out.
    async fn generate(&self, request: GenerateRequest) -> Result<Value, GenerationError>;
}

/// Run a request and deserialize the result into `T`.
///
/// Any shape mismatch becomes [`GenerationError::SchemaMismatch`]; this
/// is the strict validation boundary for all generator output.
///
/// # Errors
/// Propagates provider/timeout errors; maps decode failures to
/// `SchemaMismatch`.
pub async fn generate_structured<T>(
    generator: &dyn StructuredGenerator,
    prompt: impl Into<String> + Send,
    system_prompt: Option<&str>,
) -> Result<T, GenerationError>
where
    T: DeserializeOwned + JsonSchema,
{
    let mut request = GenerateRequest::new::<T>(prompt);
    if let Some(system) = system_prompt {
        request = request.with_system_prompt(system);
    }
    let schema = request.schema_title().unwrap_or("unknown").to_string();

    let value = generator.generate(request).await?;
    serde_json::from_value(value).map_err(|e| GenerationError::SchemaMismatch {
        schema,
        detail: e.to_string(),
    })
}
