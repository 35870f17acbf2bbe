//! CLI Command Tests
//!
//! Argument parsing, the JSON envelope, and every handler's exit code against
//! a mocked TMDB.

// =============================================================================
// CLI Argument Parsing Tests
// =============================================================================

mod cli_parsing {
    use clap::Parser;
    use lmdb_tui::cli::{Cli, Command, KindArg, TitleKind, WindowArg};

    #[test]
    fn test_no_args_is_tui_mode() {
        let cli = Cli::parse_from(["lmdb"]);
        assert!(!cli.is_cli_mode());
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_search_command_basic() {
        let cli = Cli::parse_from(["lmdb", "search", "batman"]);
        assert!(cli.is_cli_mode());
        match cli.command {
            Some(Command::Search(cmd)) => {
                assert_eq!(cmd.query, "batman");
                assert!(cmd.media_type.is_none());
                assert_eq!(cmd.pages.page, 1);
                assert_eq!(cmd.pages.pages, None);
                assert_eq!(cmd.pages.limit, None);
            }
            _ => panic!("Expected Search command"),
        }
    }

    #[test]
    fn test_search_with_paging() {
        let cli = Cli::parse_from([
            "lmdb", "search", "heat", "-t", "person", "--pages", "3", "--limit", "10",
        ]);
        match cli.command {
            Some(Command::Search(cmd)) => {
                assert_eq!(cmd.media_type, Some(KindArg::Person));
                assert_eq!(cmd.pages.pages, Some(3));
                assert_eq!(cmd.pages.limit, Some(10));
            }
            _ => panic!("Expected Search command"),
        }
    }

    #[test]
    fn test_trending_command() {
        let cli = Cli::parse_from(["lmdb", "trending", "-t", "tv", "-w", "day", "--page", "4"]);
        match cli.command {
            Some(Command::Trending(cmd)) => {
                assert_eq!(cmd.media_type, TitleKind::Tv);
                assert_eq!(cmd.window, Some(WindowArg::Day));
                assert_eq!(cmd.pages.page, 4);
            }
            _ => panic!("Expected Trending command"),
        }
    }

    #[test]
    fn test_detail_commands() {
        let cli = Cli::parse_from(["lmdb", "credits", "1399", "-t", "tv", "-l", "5"]);
        match cli.command {
            Some(Command::Credits(cmd)) => {
                assert_eq!(cmd.id, 1399);
                assert_eq!(cmd.media_type, KindArg::Tv);
                assert_eq!(cmd.limit, Some(5));
            }
            _ => panic!("Expected Credits command"),
        }

        let cli = Cli::parse_from(["lmdb", "reviews", "550"]);
        assert!(matches!(cli.command, Some(Command::Reviews(ref cmd)) if cmd.media_type == TitleKind::Movie));

        assert!(Cli::try_parse_from(["lmdb", "recommendations", "550", "-t", "person"]).is_err());
    }

    #[test]
    fn test_global_flags() {
        let cli = Cli::parse_from([
            "lmdb",
            "--json",
            "--quiet",
            "--config",
            "/tmp/lmdb.toml",
            "airing-today",
        ]);
        assert!(cli.json);
        assert!(cli.quiet);
        assert_eq!(
            cli.config.as_deref(),
            Some(std::path::Path::new("/tmp/lmdb.toml"))
        );
        assert!(cli.should_json());
    }

    #[test]
    fn test_command_aliases() {
        let aliases = [
            (vec!["lmdb", "pop"], "popular"),
            (vec!["lmdb", "tr"], "trending"),
            (vec!["lmdb", "top"], "top-rated"),
            (vec!["lmdb", "s", "x"], "search"),
            (vec!["lmdb", "i", "1"], "info"),
            (vec!["lmdb", "rec", "1"], "recommendations"),
        ];
        for (args, name) in aliases {
            let cli = Cli::try_parse_from(&args)
                .unwrap_or_else(|e| panic!("{} alias failed: {}", name, e));
            assert!(cli.is_cli_mode(), "{}", name);
        }
    }
}

// =============================================================================
// JSON Output Tests
// =============================================================================

mod json_output {
    use lmdb_tui::cli::{ExitCode, JsonOutput, ListingOutput, Output};

    #[test]
    fn test_json_output_success() {
        let output = JsonOutput::success(ListingOutput {
            page: 1,
            total_pages: 3,
            results: vec!["a", "b"],
        });
        let value = serde_json::to_value(&output).unwrap();
        assert_eq!(value["data"]["total_pages"], 3);
        assert_eq!(value["data"]["results"][1], "b");
        assert!(value.get("error").is_none());
        assert!(value.get("exit_code").is_none());
    }

    #[test]
    fn test_json_output_error() {
        let output = JsonOutput::<()>::error_msg("No results found", ExitCode::NoResults);
        let value = serde_json::to_value(&output).unwrap();
        assert_eq!(value["error"], "No results found");
        assert_eq!(value["exit_code"], 5);
        assert!(value.get("data").is_none());
    }

    #[test]
    fn test_plain_output_is_bare_data() {
        let output = Output {
            json: false,
            quiet: false,
        };
        let rendered = output.render(serde_json::json!({"id": 550})).unwrap();
        let value: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(value["id"], 550);
    }

    #[test]
    fn test_exit_codes() {
        let codes = [
            (ExitCode::Success, 0),
            (ExitCode::Error, 1),
            (ExitCode::InvalidArgs, 2),
            (ExitCode::NetworkError, 3),
            (ExitCode::NotFound, 4),
            (ExitCode::NoResults, 5),
        ];
        for (code, expected) in codes {
            assert_eq!(i32::from(code), expected);
        }
    }
}

// =============================================================================
// Command Handler Tests
// =============================================================================

mod handlers {
    use mockito::{Matcher, Server};
    use std::sync::Arc;

    use lmdb_tui::cli::{
        CreditsCmd, ExitCode, InfoCmd, KindArg, Output, PageArgs, PopularCmd, SearchCmd,
        TitleKind, TrendingCmd,
    };
    use lmdb_tui::commands;
    use lmdb_tui::models::TimeWindow;
    use lmdb_tui::TmdbClient;

    fn output() -> Output {
        Output {
            json: true,
            quiet: true,
        }
    }

    fn client(server: &Server) -> Arc<TmdbClient> {
        Arc::new(TmdbClient::with_base_url("test_key", server.url()))
    }

    fn page_body(page: u32, total_pages: u32, ids: &[u64]) -> String {
        let results: Vec<String> = ids
            .iter()
            .map(|id| format!(r#"{{"id": {}, "title": "Movie {}"}}"#, id, id))
            .collect();
        format!(
            r#"{{"page": {}, "total_pages": {}, "total_results": 100, "results": [{}]}}"#,
            page,
            total_pages,
            results.join(",")
        )
    }

    #[tokio::test]
    async fn test_popular_loads_requested_pages() {
        let mut server = Server::new_async().await;
        let first = server
            .mock("GET", "/movie/popular")
            .match_query(Matcher::UrlEncoded("page".into(), "1".into()))
            .with_status(200)
            .with_body(page_body(1, 5, &[1, 2]))
            .create_async()
            .await;
        let second = server
            .mock("GET", "/movie/popular")
            .match_query(Matcher::UrlEncoded("page".into(), "2".into()))
            .with_status(200)
            .with_body(page_body(2, 5, &[3, 4]))
            .create_async()
            .await;
        let third = server
            .mock("GET", "/movie/popular")
            .match_query(Matcher::UrlEncoded("page".into(), "3".into()))
            .expect(0)
            .create_async()
            .await;

        let cmd = PopularCmd {
            media_type: KindArg::Movie,
            pages: PageArgs {
                pages: Some(2),
                ..PageArgs::default()
            },
        };
        let code = commands::popular_cmd(cmd, client(&server), &output()).await;

        assert_eq!(code, ExitCode::Success);
        first.assert_async().await;
        second.assert_async().await;
        third.assert_async().await;
    }

    #[tokio::test]
    async fn test_trending_uses_default_window() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/trending/movie/day")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(page_body(1, 1, &[7]))
            .create_async()
            .await;

        let cmd = TrendingCmd {
            media_type: TitleKind::Movie,
            window: None,
            pages: PageArgs::default(),
        };
        let code = commands::trending_cmd(cmd, TimeWindow::Day, client(&server), &output()).await;

        assert_eq!(code, ExitCode::Success);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_failed_listing_is_no_results() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/movie/popular")
            .match_query(Matcher::Any)
            .with_status(500)
            .create_async()
            .await;

        let cmd = PopularCmd {
            media_type: KindArg::Movie,
            pages: PageArgs::default(),
        };
        let code = commands::popular_cmd(cmd, client(&server), &output()).await;
        assert_eq!(code, ExitCode::NoResults);
    }

    #[tokio::test]
    async fn test_blank_search_makes_no_request() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        let cmd = SearchCmd {
            query: "   ".into(),
            media_type: None,
            pages: PageArgs::default(),
        };
        let code = commands::search_cmd(cmd, client(&server), &output()).await;

        assert_eq!(code, ExitCode::NoResults);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_info_not_found() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/person/1")
            .match_query(Matcher::Any)
            .with_status(404)
            .create_async()
            .await;

        let cmd = InfoCmd {
            id: 1,
            media_type: KindArg::Person,
        };
        let code = commands::info_cmd(cmd, client(&server), &output()).await;
        assert_eq!(code, ExitCode::NotFound);
    }

    #[tokio::test]
    async fn test_info_without_credits_is_error() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/movie/550")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"id": 550, "title": "Fight Club"}"#)
            .create_async()
            .await;

        let cmd = InfoCmd {
            id: 550,
            media_type: KindArg::Movie,
        };
        let code = commands::info_cmd(cmd, client(&server), &output()).await;
        assert_eq!(code, ExitCode::Error);
    }

    #[tokio::test]
    async fn test_credits_for_person() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/person/287/combined_credits")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(
                r#"{
                    "cast": [{"id": 550, "media_type": "movie", "title": "Fight Club", "release_date": "1999-10-15"}],
                    "crew": []
                }"#,
            )
            .create_async()
            .await;

        let cmd = CreditsCmd {
            id: 287,
            media_type: KindArg::Person,
            limit: None,
        };
        let code = commands::credits_cmd(cmd, client(&server), &output()).await;

        assert_eq!(code, ExitCode::Success);
        mock.assert_async().await;
    }
}
