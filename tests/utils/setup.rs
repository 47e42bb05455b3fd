use std::sync::Arc;

use maksijatsi::{
    config::AppConfig,
    event::EventBus,
    game::{FixedDiceProvider, GameRepository, GameService, GameSession, InMemoryGameRepository},
    user::{InMemoryUserRepository, User, UserRepository},
};

// ============================================================================
// Test Setup Infrastructure
// ============================================================================

pub struct TestSetup {
    pub service: Arc<GameService>,
    pub games: Arc<dyn GameRepository>,
    pub users: Arc<InMemoryUserRepository>,
    pub dice: Arc<FixedDiceProvider>,
    pub event_bus: EventBus,
    pub config: AppConfig,
    /// User ids in join order
    pub players: Vec<String>,
}

pub struct TestSetupBuilder {
    players: Vec<String>,
    config: AppConfig,
    games: Option<Arc<dyn GameRepository>>,
}

#[allow(dead_code)]
impl TestSetupBuilder {
    pub fn new() -> Self {
        Self {
            players: vec![],
            config: AppConfig::default(),
            games: None,
        }
    }

    pub fn with_players(mut self, players: Vec<&str>) -> Self {
        self.players = players.into_iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_two_players(self) -> Self {
        self.with_players(vec!["alice", "bob"])
    }

    pub fn with_three_players(self) -> Self {
        self.with_players(vec!["alice", "bob", "carol"])
    }

    pub fn with_config(mut self, config: AppConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_game_repository(mut self, games: Arc<dyn GameRepository>) -> Self {
        self.games = Some(games);
        self
    }

    pub async fn build(self) -> TestSetup {
        let games = self
            .games
            .unwrap_or_else(|| Arc::new(InMemoryGameRepository::new()));
        let users = Arc::new(InMemoryUserRepository::new());
        let dice = Arc::new(FixedDiceProvider::default());
        let event_bus = EventBus::new(self.config.event_capacity);

        let mut players = vec![];
        for name in &self.players {
            let user = User::new(name.clone(), format!("owner-{}", name));
            users.create_user(&user).await.unwrap();
            players.push(user.id);
        }

        let service = Arc::new(GameService::new(
            Arc::clone(&games),
            users.clone(),
            dice.clone(),
            event_bus.clone(),
            &self.config,
        ));

        TestSetup {
            service,
            games,
            users,
            dice,
            event_bus,
            config: self.config,
            players,
        }
    }
}

#[allow(dead_code)]
impl TestSetup {
    /// Creates a game hosted by the first player, lets everyone join and starts it
    pub async fn started_game(&self) -> GameSession {
        let game = self.joinable_game().await;
        self.service
            .start_game(&game.id, &self.players[0])
            .await
            .unwrap()
    }

    pub async fn joinable_game(&self) -> GameSession {
        let game = self
            .service
            .create_game(&self.players[0], Some("test game".to_string()))
            .await
            .unwrap();
        for player in &self.players[1..] {
            self.service.join_game(&game.id, player).await.unwrap();
        }
        self.service.get_game(&game.id).await.unwrap()
    }

    pub fn player(&self, index: usize) -> &str {
        &self.players[index]
    }
}
