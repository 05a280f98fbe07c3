use std::sync::Arc;

use futures::future::BoxFuture;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;

use super::{
    QuizBackend,
    error::{ClientError, ClientResult},
};
use crate::{
    dto::{
        leaderboard::{
            CreateLeaderboardEntryRequest, CreateLeaderboardEntryResponse, LeaderboardRowDto,
        },
        question::QuestionDto,
    },
    engine::Question,
};

const QUESTIONS_PATH: &str = "/api/questions";
const LEADERBOARD_PATH: &str = "/api/leaderboard";

/// [`QuizBackend`] talking to the quiz HTTP API with reqwest.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Arc<str>,
}

impl ApiClient {
    /// Build a client for the API served at `base_url` (e.g. `http://localhost:5000`).
    pub fn new(base_url: &str) -> ClientResult<Self> {
        let client = Client::builder()
            .build()
            .map_err(|source| ClientError::ClientBuilder { source })?;
        Ok(Self {
            client,
            base_url: Arc::from(base_url.trim_end_matches('/')),
        })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client
            .request(method, format!("{}{}", self.base_url, path))
    }

    /// Fetch a batch of questions.
    pub async fn questions(&self) -> ClientResult<Vec<QuestionDto>> {
        let response = send(self.request(Method::GET, QUESTIONS_PATH), QUESTIONS_PATH).await?;
        decode(response, QUESTIONS_PATH).await
    }

    /// Fetch the top leaderboard rows.
    pub async fn leaderboard(&self) -> ClientResult<Vec<LeaderboardRowDto>> {
        let response =
            send(self.request(Method::GET, LEADERBOARD_PATH), LEADERBOARD_PATH).await?;
        decode(response, LEADERBOARD_PATH).await
    }

    /// Append a leaderboard entry.
    pub async fn add_score(
        &self,
        entry: &CreateLeaderboardEntryRequest,
    ) -> ClientResult<CreateLeaderboardEntryResponse> {
        let builder = self.request(Method::POST, LEADERBOARD_PATH).json(entry);
        let response = send(builder, LEADERBOARD_PATH).await?;
        decode(response, LEADERBOARD_PATH).await
    }
}

async fn send(builder: RequestBuilder, path: &'static str) -> ClientResult<Response> {
    let response = builder
        .send()
        .await
        .map_err(|source| ClientError::RequestSend { path, source })?;

    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(ClientError::RequestStatus { path, status })
    }
}

async fn decode<T>(response: Response, path: &'static str) -> ClientResult<T>
where
    T: DeserializeOwned,
{
    response
        .json::<T>()
        .await
        .map_err(|source| ClientError::DecodeResponse { path, source })
}

impl QuizBackend for ApiClient {
    fn fetch_questions(&self) -> BoxFuture<'static, ClientResult<Vec<Question>>> {
        let client = self.clone();
        Box::pin(async move {
            let questions = client.questions().await?;
            Ok(questions.into_iter().map(Question::from).collect())
        })
    }

    fn fetch_leaderboard(&self) -> BoxFuture<'static, ClientResult<Vec<LeaderboardRowDto>>> {
        let client = self.clone();
        Box::pin(async move { client.leaderboard().await })
    }

    fn submit_result(
        &self,
        entry: CreateLeaderboardEntryRequest,
    ) -> BoxFuture<'static, ClientResult<i32>> {
        let client = self.clone();
        Box::pin(async move { client.add_score(&entry).await.map(|created| created.id) })
    }
}
