//! Image and video generation and media job control.

use reqwest::Method;

use crate::client::{path_segment, require, Auth, ClientError, Payload, WayGptClient};
use crate::model::{ImageGenerationRequest, ImageGenerationResponse, MediaJob, VideoGenerationRequest};

pub const IMAGE_GENERATIONS_PATH: &str = "/api/v1/waygpt/images/generations";
pub const VIDEO_GENERATIONS_PATH: &str = "/api/v1/waygpt/videos/generations";
pub const MEDIA_JOBS_PATH: &str = "/api/v1/waygpt/media/jobs";

impl WayGptClient {
    /// Generate images from a prompt.
    pub async fn image_generations(
        &self,
        request: ImageGenerationRequest,
    ) -> Result<ImageGenerationResponse, ClientError> {
        require(&request.prompt, "prompt")?;
        let body = request.into_body();
        self.request_json(
            Method::POST,
            IMAGE_GENERATIONS_PATH,
            Payload::json(&body)?,
            Auth::ProjectKey,
        )
        .await
    }

    /// Start a video generation job.
    pub async fn video_generations(
        &self,
        request: VideoGenerationRequest,
    ) -> Result<MediaJob, ClientError> {
        require(&request.prompt, "prompt")?;
        let body = request.into_body();
        self.request_json(
            Method::POST,
            VIDEO_GENERATIONS_PATH,
            Payload::json(&body)?,
            Auth::ProjectKey,
        )
        .await
    }

    /// Current status of a media job.
    pub async fn get_media_job(&self, job_id: &str) -> Result<MediaJob, ClientError> {
        let job_id = path_segment(job_id, "job ID")?;
        self.request_json(
            Method::GET,
            &format!("{}/{}", MEDIA_JOBS_PATH, job_id),
            Payload::Empty,
            Auth::ProjectKey,
        )
        .await
    }

    /// Cancel a media job.
    pub async fn cancel_media_job(&self, job_id: &str) -> Result<MediaJob, ClientError> {
        let job_id = path_segment(job_id, "job ID")?;
        self.request_json(
            Method::POST,
            &format!("{}/{}/cancel", MEDIA_JOBS_PATH, job_id),
            Payload::Empty,
            Auth::ProjectKey,
        )
        .await
    }
}
