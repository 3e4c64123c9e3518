//! S3 implementation of [`ObjectStorage`]

use crate::error::api_error;
use async_trait::async_trait;
use aws_sdk_s3 as s3;
use aws_sdk_s3::error::ProvideErrorMetadata;
use aws_sdk_s3::primitives::ByteStream;
use vidskill_cloud::{CloudError, ObjectStorage, ObjectSummary, PutObjectRequest, Result, Tag};

/// Maximum number of keys accepted by one batch delete
const DELETE_BATCH_SIZE: usize = 1000;

pub struct S3Storage {
    client: s3::Client,
}

impl S3Storage {
    pub fn new(client: s3::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ObjectStorage for S3Storage {
    async fn get_bucket_location(&self, bucket: &str) -> Result<String> {
        let response = self
            .client
            .get_bucket_location()
            .bucket(bucket)
            .send()
            .await
            .map_err(|e| api_error("getBucketLocation", e))?;

        // us-east-1 buckets report an empty constraint
        Ok(response
            .location_constraint()
            .map(|c| c.as_str().to_string())
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| "us-east-1".to_string()))
    }

    async fn list_objects(&self, bucket: &str, prefix: Option<&str>) -> Result<Vec<ObjectSummary>> {
        let mut objects = Vec::new();
        let mut pages = self
            .client
            .list_objects_v2()
            .bucket(bucket)
            .set_prefix(prefix.map(str::to_string))
            .into_paginator()
            .send();

        while let Some(page) = pages.next().await {
            let page = page.map_err(|e| api_error("listObjects", e))?;
            for object in page.contents() {
                if let Some(key) = object.key() {
                    objects.push(ObjectSummary {
                        key: key.to_string(),
                        size: object.size().unwrap_or_default(),
                    });
                }
            }
        }

        Ok(objects)
    }

    async fn delete_objects(&self, bucket: &str, keys: &[String]) -> Result<usize> {
        let mut deleted = 0;

        for chunk in keys.chunks(DELETE_BATCH_SIZE) {
            let identifiers = chunk
                .iter()
                .map(|key| s3::types::ObjectIdentifier::builder().key(key).build())
                .collect::<std::result::Result<Vec<_>, _>>()
                .map_err(|e| CloudError::InvalidRequest(e.to_string()))?;

            let delete = s3::types::Delete::builder()
                .set_objects(Some(identifiers))
                .quiet(true)
                .build()
                .map_err(|e| CloudError::InvalidRequest(e.to_string()))?;

            let response = self
                .client
                .delete_objects()
                .bucket(bucket)
                .delete(delete)
                .send()
                .await
                .map_err(|e| api_error("deleteObjects", e))?;

            if let Some(failure) = response.errors().first() {
                return Err(CloudError::api(
                    "deleteObjects",
                    format!(
                        "{} ({} keys not deleted)",
                        failure.message().unwrap_or("unknown error"),
                        response.errors().len()
                    ),
                ));
            }

            deleted += chunk.len();
        }

        Ok(deleted)
    }

    async fn put_object(&self, request: &PutObjectRequest) -> Result<()> {
        let body = ByteStream::from_path(&request.source)
            .await
            .map_err(|e| CloudError::InvalidRequest(format!("{}: {}", request.source.display(), e)))?;

        self.client
            .put_object()
            .bucket(&request.bucket)
            .key(&request.key)
            .set_content_type(request.content_type.clone())
            .body(body)
            .send()
            .await
            .map_err(|e| api_error("putObject", e))?;
        Ok(())
    }

    async fn get_bucket_tagging(&self, bucket: &str) -> Result<Vec<Tag>> {
        match self.client.get_bucket_tagging().bucket(bucket).send().await {
            Ok(response) => Ok(response
                .tag_set()
                .iter()
                .map(|t| Tag::new(t.key(), t.value()))
                .collect()),
            // A bucket that was never tagged has no tag set at all
            Err(e) if e.code() == Some("NoSuchTagSet") => Ok(Vec::new()),
            Err(e) => Err(api_error("getBucketTagging", e)),
        }
    }

    async fn put_bucket_tagging(&self, bucket: &str, tags: &[Tag]) -> Result<()> {
        let tag_set = tags
            .iter()
            .map(|t| s3::types::Tag::builder().key(&t.key).value(&t.value).build())
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| CloudError::InvalidRequest(e.to_string()))?;

        let tagging = s3::types::Tagging::builder()
            .set_tag_set(Some(tag_set))
            .build()
            .map_err(|e| CloudError::InvalidRequest(e.to_string()))?;

        self.client
            .put_bucket_tagging()
            .bucket(bucket)
            .tagging(tagging)
            .send()
            .await
            .map_err(|e| api_error("putBucketTagging", e))?;
        Ok(())
    }

    async fn delete_bucket_tagging(&self, bucket: &str) -> Result<()> {
        self.client
            .delete_bucket_tagging()
            .bucket(bucket)
            .send()
            .await
            .map_err(|e| api_error("deleteBucketTagging", e))?;
        Ok(())
    }
}
