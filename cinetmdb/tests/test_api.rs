use cinetmdb::error::TmdbError;
use cinetmdb::{Catalog, SortOrder, TmdbClient};
use mockito::Matcher;

fn client_for(server: &mockito::ServerGuard) -> TmdbClient {
    TmdbClient::new("test-key", server.url()).unwrap()
}

#[tokio::test]
async fn movie_details_are_fetched_and_parsed() -> anyhow::Result<()> {
    let mut server = mockito::Server::new_async().await;

    let mock = server
        .mock("GET", "/movie/14")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("api_key".into(), "test-key".into()),
            Matcher::UrlEncoded("language".into(), "en".into()),
        ]))
        .with_status(200)
        .with_body(
            r#"{
                "id": 14,
                "title": "American Beauty",
                "release_date": "1999-09-15",
                "runtime": 122,
                "budget": 15000000,
                "tagline": "Look closer.",
                "genres": [{"id": 18, "name": "Drama"}]
            }"#,
        )
        .create_async()
        .await;

    let client = client_for(&server);
    let movie = client.movie("14", "en").await?;

    assert_eq!(movie.id, "14");
    assert_eq!(movie.title, "American Beauty");
    assert_eq!(movie.release_year(), Some(1999));
    assert_eq!(movie.runtime, Some(122));
    assert_eq!(movie.genres[0].name, "Drama");

    mock.assert_async().await;
    Ok(())
}

#[tokio::test]
async fn missing_movie_maps_to_not_found() -> anyhow::Result<()> {
    let mut server = mockito::Server::new_async().await;

    let _mock = server
        .mock("GET", "/movie/999999999")
        .match_query(Matcher::Any)
        .with_status(404)
        .with_body(
            r#"{"status_code": 34, "status_message": "The resource you requested could not be found."}"#,
        )
        .create_async()
        .await;

    let client = client_for(&server);
    let err = client.movie("999999999", "en").await.unwrap_err();

    assert!(err.is_not_found(), "expected NotFound, got {err:?}");
    Ok(())
}

#[tokio::test]
async fn invalid_key_maps_to_unauthorized() -> anyhow::Result<()> {
    let mut server = mockito::Server::new_async().await;

    let _mock = server
        .mock("GET", "/configuration")
        .match_query(Matcher::Any)
        .with_status(401)
        .with_body(r#"{"status_code": 7, "status_message": "Invalid API key."}"#)
        .create_async()
        .await;

    let client = client_for(&server);
    let err = client.configuration().await.unwrap_err();

    assert!(matches!(err, TmdbError::Unauthorized(_)));
    Ok(())
}

#[tokio::test]
async fn rate_limit_maps_to_dedicated_error() -> anyhow::Result<()> {
    let mut server = mockito::Server::new_async().await;

    let _mock = server
        .mock("GET", "/person/976")
        .match_query(Matcher::Any)
        .with_status(429)
        .with_body(r#"{"status_code": 25, "status_message": "Too many requests."}"#)
        .create_async()
        .await;

    let client = client_for(&server);
    let err = client.person("976", "en").await.unwrap_err();

    assert!(err.is_rate_limit());
    Ok(())
}

#[tokio::test]
async fn discover_sends_month_date_range() -> anyhow::Result<()> {
    let mut server = mockito::Server::new_async().await;

    let mock = server
        .mock("GET", "/discover/movie")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("primary_release_date.gte".into(), "2024-01-01".into()),
            Matcher::UrlEncoded("primary_release_date.lte".into(), "2024-01-31".into()),
            Matcher::UrlEncoded("sort_by".into(), "primary_release_date.asc".into()),
            Matcher::UrlEncoded("page".into(), "1".into()),
        ]))
        .with_status(200)
        .with_body(
            r#"{
                "page": 1,
                "total_pages": 1,
                "total_results": 1,
                "results": [
                    {"id": 866398, "title": "The Beekeeper", "release_date": "2024-01-10"}
                ]
            }"#,
        )
        .create_async()
        .await;

    let client = client_for(&server);
    let page = client
        .discover(2024, 1, SortOrder::PrimaryReleaseDateAsc, 1, "en")
        .await?;

    assert!(page.is_last());
    assert_eq!(page.results.len(), 1);
    assert_eq!(page.results[0].id, "866398");

    mock.assert_async().await;
    Ok(())
}

#[tokio::test]
async fn credits_parse_cast_and_crew() -> anyhow::Result<()> {
    let mut server = mockito::Server::new_async().await;

    let _mock = server
        .mock("GET", "/movie/14/credits")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(
            r#"{
                "id": 14,
                "cast": [{"id": 1979, "name": "Kevin Spacey", "character": "Lester Burnham", "order": 0}],
                "crew": [{"id": 72102, "name": "Sam Mendes", "job": "Director", "department": "Directing"}]
            }"#,
        )
        .create_async()
        .await;

    let client = client_for(&server);
    let credits = client.credits("14").await?;

    assert_eq!(credits.id, "14");
    assert_eq!(credits.cast.len(), 1);
    assert_eq!(credits.cast[0].character.as_deref(), Some("Lester Burnham"));
    assert_eq!(credits.crew[0].job.as_deref(), Some("Director"));
    Ok(())
}

#[tokio::test]
async fn genre_list_is_unwrapped() -> anyhow::Result<()> {
    let mut server = mockito::Server::new_async().await;

    let _mock = server
        .mock("GET", "/genre/movie/list")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(
            r#"{"genres": [{"id": 28, "name": "Action"}, {"id": 878, "name": "Science Fiction"}]}"#,
        )
        .create_async()
        .await;

    let client = client_for(&server);
    let genres = client.genres("en").await?;

    assert_eq!(genres.len(), 2);
    assert_eq!(genres[1].slug(), "science-fiction");
    Ok(())
}
