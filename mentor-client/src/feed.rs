use crate::error::ClientError;
use crate::http_client::HttpClient;
use crate::models::{CommentRequest, CreatePostRequest, FeedPage, Post, PostEnvelope};
use reqwest::Method;

pub const DEFAULT_PAGE_SIZE: u32 = 10;

#[derive(Debug, Clone)]
pub struct FeedClient {
    http: HttpClient,
}

impl FeedClient {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    pub async fn get_feed(&self, page: u32, limit: u32) -> Result<FeedPage, ClientError> {
        let request = self
            .http
            .request(Method::GET, "/posts/feed")
            .await
            .query(&[("page", page), ("limit", limit)]);
        self.http.send(request).await
    }

    pub async fn create_post(&self, req: &CreatePostRequest) -> Result<Post, ClientError> {
        if req.content.trim().is_empty() && req.images.is_empty() {
            return Err(ClientError::Validation(
                "A post needs text or at least one image".into(),
            ));
        }

        let envelope: PostEnvelope = self.http.post("/posts", req).await?;
        Ok(envelope.post)
    }

    pub async fn toggle_like(&self, post_id: &str) -> Result<Post, ClientError> {
        self.mutate(post_id, "like").await
    }

    pub async fn share_post(&self, post_id: &str) -> Result<Post, ClientError> {
        self.mutate(post_id, "share").await
    }

    pub async fn add_comment(&self, post_id: &str, content: &str) -> Result<Post, ClientError> {
        let content = content.trim();
        if content.is_empty() {
            return Err(ClientError::Validation("Comment cannot be empty".into()));
        }

        let path = format!("/posts/{}/comments", post_id);
        let envelope: PostEnvelope = self.http.post(&path, &CommentRequest { content }).await?;
        Ok(envelope.post)
    }

    async fn mutate(&self, post_id: &str, action: &str) -> Result<Post, ClientError> {
        let path = format!("/posts/{}/{}", post_id, action);
        let request = self.http.request(Method::POST, &path).await;
        let envelope: PostEnvelope = self.http.send(request).await?;
        Ok(envelope.post)
    }
}

/// Posts the feed view shows, in server order. Counters are never recomputed
/// locally: whatever post the server returns replaces the local copy.
#[derive(Debug, Clone)]
pub struct FeedState {
    posts: Vec<Post>,
    page: u32,
    page_size: u32,
    has_more: bool,
}

impl Default for FeedState {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl FeedState {
    pub fn new(page_size: u32) -> Self {
        Self {
            posts: Vec::new(),
            page: 0,
            page_size: page_size.max(1),
            has_more: true,
        }
    }

    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    /// Last page loaded; 0 before the first load.
    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn next_page(&self) -> u32 {
        self.page + 1
    }

    /// Replaces the list with a freshly loaded first page.
    pub fn reset_with(&mut self, page: FeedPage) {
        self.posts = page.posts;
        self.page = page.pagination.current_page;
        self.has_more = page.pagination.has_next_page;
    }

    /// Appends a further page; existing posts stay in place.
    pub fn append_page(&mut self, page: FeedPage) {
        self.posts.extend(page.posts);
        self.page = page.pagination.current_page;
        self.has_more = page.pagination.has_next_page;
    }

    /// Splices the server's copy of a post into the list by id. Returns false
    /// when the post is not loaded.
    pub fn replace_post(&mut self, post: Post) -> bool {
        match self.posts.iter().position(|p| p.id == post.id) {
            Some(index) => {
                self.posts[index] = post;
                true
            }
            None => false,
        }
    }

    pub fn prepend(&mut self, post: Post) {
        self.posts.insert(0, post);
    }
}

/// Feed client and its view state together, mirroring how the feed view
/// drives the API.
#[derive(Debug, Clone)]
pub struct Feed {
    client: FeedClient,
    state: FeedState,
}

impl Feed {
    pub fn new(client: FeedClient, page_size: u32) -> Self {
        Self {
            client,
            state: FeedState::new(page_size),
        }
    }

    pub fn state(&self) -> &FeedState {
        &self.state
    }

    pub async fn refresh(&mut self) -> Result<(), ClientError> {
        let page = self.client.get_feed(1, self.state.page_size()).await?;
        self.state.reset_with(page);
        Ok(())
    }

    /// Loads the next page if the server reported one. Returns how many posts
    /// were added.
    pub async fn load_more(&mut self) -> Result<usize, ClientError> {
        if !self.state.has_more() {
            return Ok(0);
        }

        let page = self
            .client
            .get_feed(self.state.next_page(), self.state.page_size())
            .await?;
        let added = page.posts.len();
        self.state.append_page(page);
        tracing::debug!("Loaded feed page {} ({} posts)", self.state.page(), added);
        Ok(added)
    }

    pub async fn create_post(&mut self, req: &CreatePostRequest) -> Result<Post, ClientError> {
        let post = self.client.create_post(req).await?;
        self.state.prepend(post.clone());
        Ok(post)
    }

    pub async fn toggle_like(&mut self, post_id: &str) -> Result<Post, ClientError> {
        let post = self.client.toggle_like(post_id).await?;
        self.state.replace_post(post.clone());
        Ok(post)
    }

    pub async fn add_comment(&mut self, post_id: &str, content: &str) -> Result<Post, ClientError> {
        let post = self.client.add_comment(post_id, content).await?;
        self.state.replace_post(post.clone());
        Ok(post)
    }

    pub async fn share_post(&mut self, post_id: &str) -> Result<Post, ClientError> {
        let post = self.client.share_post(post_id).await?;
        self.state.replace_post(post.clone());
        Ok(post)
    }
}
