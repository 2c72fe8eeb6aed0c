use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_s3::Client;
use aws_sdk_s3::error::{DisplayErrorContext, SdkError};
use aws_sdk_s3::primitives::ByteStream;
use bytes::{Bytes, BytesMut};

use super::{ObjectStore, StoreError};

/// Object store backed by an S3-compatible bucket.
///
/// The bucket is a field on this value and every operation reads it from
/// `self`; there is no process-wide bucket setting.
pub struct S3Store {
    client: Client,
    bucket: String,
}

impl S3Store {
    /// Build a client for `bucket`. `endpoint` and `path_style` support
    /// MinIO-style deployments.
    pub async fn connect(
        bucket: String,
        region: String,
        endpoint: Option<String>,
        path_style: bool,
    ) -> Self {
        let mut loader =
            aws_config::defaults(BehaviorVersion::latest()).region(Region::new(region));
        if let Some(endpoint) = endpoint {
            loader = loader.endpoint_url(endpoint);
        }
        let shared = loader.load().await;

        let mut builder = aws_sdk_s3::config::Builder::from(&shared);
        if path_style {
            builder = builder.force_path_style(true);
        }

        tracing::info!("S3 store ready, bucket {}", bucket);

        Self {
            client: Client::from_conf(builder.build()),
            bucket,
        }
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }
}

fn classify<E>(key: &str, err: &SdkError<E>, not_found: impl Fn(&E) -> bool) -> StoreError
where
    E: std::error::Error + Send + Sync + 'static,
{
    if let SdkError::ServiceError(ctx) = err
        && not_found(ctx.err())
    {
        return StoreError::NotFound(key.to_string());
    }
    StoreError::Backend(format!("{}", DisplayErrorContext(err)))
}

#[async_trait]
impl ObjectStore for S3Store {
    async fn get(&self, key: &str) -> Result<Bytes, StoreError> {
        tracing::debug!("hydrating {} from s3://{}", key, self.bucket);

        // Best-effort pre-sizing; an unknown size just means growth on append.
        let capacity = self.head(key).await.ok().flatten().unwrap_or(0) as usize;

        let output = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| classify(key, &e, |err| err.is_no_such_key()))?;

        let mut body = output.body;
        let mut buf = BytesMut::with_capacity(capacity);
        while let Some(chunk) = body
            .try_next()
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?
        {
            buf.extend_from_slice(&chunk);
        }

        Ok(buf.freeze())
    }

    async fn head(&self, key: &str) -> Result<Option<u64>, StoreError> {
        let output = self
            .client
            .head_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| classify(key, &e, |err| err.is_not_found()))?;

        Ok(output.content_length().map(|len| len.max(0) as u64))
    }

    async fn put(&self, key: &str, value: Bytes) -> Result<(), StoreError> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(value))
            .send()
            .await
            .map_err(|e| classify(key, &e, |_| false))?;

        Ok(())
    }
}
