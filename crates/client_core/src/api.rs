use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use shared::{
    domain::{Course, CourseChanges, CourseId},
    error::ApiError,
    protocol::{course_route, CourseListResponse, COURSES_ROUTE},
};
use tracing::debug;
use url::Url;

use crate::error::NetworkError;

/// Remote courses backend.
#[async_trait]
pub trait CoursesApi: Send + Sync {
    async fn load_all(&self) -> Result<Vec<Course>, NetworkError>;
    async fn save(&self, id: &CourseId, changes: &CourseChanges) -> Result<Course, NetworkError>;
}

pub struct HttpCoursesApi {
    http: Client,
    base_url: Url,
}

impl HttpCoursesApi {
    pub fn new(base_url: Url) -> Self {
        Self {
            http: Client::new(),
            base_url: with_trailing_slash(base_url),
        }
    }

    pub fn with_timeout(base_url: Url, timeout: Option<Duration>) -> Result<Self, NetworkError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            http: builder.build()?,
            base_url: with_trailing_slash(base_url),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolves a route below the base URL, keeping any path prefix it has.
    fn endpoint(&self, route: &str) -> Result<Url, NetworkError> {
        self.base_url
            .join(route.trim_start_matches('/'))
            .map_err(|err| NetworkError::transport(format!("invalid route '{route}': {err}")))
    }
}

#[async_trait]
impl CoursesApi for HttpCoursesApi {
    async fn load_all(&self) -> Result<Vec<Course>, NetworkError> {
        let url = self.endpoint(COURSES_ROUTE)?;
        debug!(%url, "courses: GET");
        let res = ensure_success(self.http.get(url).send().await?).await?;
        let body: CourseListResponse = res.json().await?;
        Ok(body.payload)
    }

    async fn save(&self, id: &CourseId, changes: &CourseChanges) -> Result<Course, NetworkError> {
        let url = self.endpoint(&course_route(id))?;
        debug!(%url, "courses: PUT");
        let res = ensure_success(self.http.put(url).json(changes).send().await?).await?;
        Ok(res.json().await?)
    }
}

fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

async fn ensure_success(res: Response) -> Result<Response, NetworkError> {
    let status = res.status();
    if status.is_success() {
        return Ok(res);
    }

    let body = res.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ApiError>(&body)
        .map(|err| err.message)
        .unwrap_or_else(|_| {
            status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string()
        });
    Err(NetworkError::http(status.as_u16(), message))
}
