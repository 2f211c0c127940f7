use std::sync::Arc;

use crate::application::engagement::EngagementService;
use crate::application::feed::FeedService;
use crate::application::posts::PostService;

#[derive(Clone)]
pub struct ApiState {
    pub feed: Arc<FeedService>,
    pub posts: Arc<PostService>,
    pub engagement: Arc<EngagementService>,
}
