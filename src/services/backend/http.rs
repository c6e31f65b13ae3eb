/// JSON-over-HTTP movie backend
///
/// Endpoints:
/// - GET    /movies, /genres, /movies/keywords
/// - POST   /movies/{collection}, PUT /movies, DELETE /movies/{title}
/// - PUT    /preferences
/// - GET    /movies/suggest, /movies/details/{title}
/// - POST   /movies/related/{title}
///
/// Every title in a path segment is percent-encoded.
use crate::{
    config::Config,
    error::{AppError, AppResult},
    models::{
        CollectionName, GenresResponse, KeywordAnalysis, MoveRequest, MoviesResponse, NewMovie,
        Preferences, RelatedRequest, Suggestion,
    },
    services::backend::MovieBackend,
};
use reqwest::{Client as HttpClient, Response};
use serde::{de::DeserializeOwned, Deserialize};

#[derive(Clone)]
pub struct HttpBackend {
    http_client: HttpClient,
    api_url: String,
}

/// Error body shape used by the backend (`{"detail": "..."}`)
#[derive(Deserialize)]
struct ErrorBody {
    detail: Option<String>,
}

impl HttpBackend {
    pub fn new(api_url: impl Into<String>) -> Self {
        let api_url = api_url.into().trim_end_matches('/').to_string();
        Self {
            http_client: HttpClient::new(),
            api_url,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.backend_base())
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_url, path)
    }

    fn title_url(&self, prefix: &str, title: &str) -> String {
        format!("{}{}/{}", self.api_url, prefix, urlencoding::encode(title))
    }

    /// Turns a non-success response into `RemoteOperationFailed`
    async fn check(operation: &'static str, response: Response) -> AppResult<Response> {
        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let detail = extract_detail(&body);

        tracing::error!(
            operation,
            status = %status,
            detail = %detail,
            "Backend request failed"
        );

        Err(AppError::RemoteOperationFailed {
            operation,
            status: status.as_u16(),
            detail,
        })
    }

    async fn read_json<T: DeserializeOwned>(
        operation: &'static str,
        response: Response,
    ) -> AppResult<T> {
        let response = Self::check(operation, response).await?;
        let status = response.status().as_u16();
        let text = response.text().await?;
        tracing::debug!(operation, response = %text, "Raw backend response");

        serde_json::from_str(&text).map_err(|e| {
            tracing::error!(operation, error = %e, "Failed to deserialize backend response");
            AppError::RemoteOperationFailed {
                operation,
                status,
                detail: format!("Failed to parse backend response: {}", e),
            }
        })
    }
}

/// Pulls the human-readable reason out of an error body
fn extract_detail(body: &str) -> String {
    if let Ok(ErrorBody {
        detail: Some(detail),
    }) = serde_json::from_str::<ErrorBody>(body)
    {
        return detail;
    }
    if body.trim().is_empty() {
        "Unknown error".to_string()
    } else {
        body.trim().to_string()
    }
}

#[async_trait::async_trait]
impl MovieBackend for HttpBackend {
    async fn fetch_movies(&self) -> AppResult<MoviesResponse> {
        let response = self.http_client.get(self.url("/movies")).send().await?;
        Self::read_json("fetch_movies", response).await
    }

    async fn fetch_genres(&self) -> AppResult<Vec<String>> {
        let response = self.http_client.get(self.url("/genres")).send().await?;
        let genres: GenresResponse = Self::read_json("fetch_genres", response).await?;
        Ok(genres.genres)
    }

    async fn fetch_keyword_analysis(&self) -> AppResult<KeywordAnalysis> {
        let response = self
            .http_client
            .get(self.url("/movies/keywords"))
            .send()
            .await?;
        Self::read_json("fetch_keyword_analysis", response).await
    }

    async fn add_movie(&self, collection: CollectionName, movie: &NewMovie) -> AppResult<()> {
        let url = self.url(&format!("/movies/{}", collection.as_str()));
        tracing::debug!(title = %movie.title, collection = %collection, "POST movie");

        let response = self.http_client.post(url).json(movie).send().await?;
        Self::check("add_movie", response).await?;
        Ok(())
    }

    async fn move_movie(&self, request: &MoveRequest) -> AppResult<()> {
        tracing::debug!(title = %request.title, new_list = %request.new_list, "PUT movie");

        let response = self
            .http_client
            .put(self.url("/movies"))
            .json(request)
            .send()
            .await?;
        Self::check("move_movie", response).await?;
        Ok(())
    }

    async fn delete_movie(&self, title: &str) -> AppResult<()> {
        let response = self
            .http_client
            .delete(self.title_url("/movies", title))
            .send()
            .await?;
        Self::check("delete_movie", response).await?;
        Ok(())
    }

    async fn update_preferences(&self, preferences: &Preferences) -> AppResult<()> {
        let response = self
            .http_client
            .put(self.url("/preferences"))
            .json(preferences)
            .send()
            .await?;
        Self::check("update_preferences", response).await?;
        Ok(())
    }

    async fn suggest(&self) -> AppResult<Suggestion> {
        let response = self
            .http_client
            .get(self.url("/movies/suggest"))
            .send()
            .await?;
        Self::read_json("suggest", response).await
    }

    async fn movie_details(&self, title: &str) -> AppResult<Suggestion> {
        let response = self
            .http_client
            .get(self.title_url("/movies/details", title))
            .send()
            .await?;
        Self::read_json("movie_details", response).await
    }

    async fn related_movie(
        &self,
        title: &str,
        previous_suggestions: &[String],
    ) -> AppResult<Suggestion> {
        let body = RelatedRequest {
            previous_suggestions: previous_suggestions.to_vec(),
        };
        let response = self
            .http_client
            .post(self.title_url("/movies/related", title))
            .json(&body)
            .send()
            .await?;
        Self::read_json("related_movie", response).await
    }

    fn name(&self) -> &'static str {
        "http"
    }
}
