use headless::{Browser, BrowserError, Config, HtmlPage, Page};
use mockito::Matcher;
use reqwest::StatusCode;
use url::Url;

const FORM: &str = r#"<html><body>
  <form action="" method="post">
    <input name="name" value="Jane">
    <textarea name="comment">
Hi</textarea>
    <input type="submit" name="send" value="Send">
  </form>
</body></html>"#;

fn browser() -> Browser {
    Browser::new(Config::default()).unwrap()
}

fn url(server: &mockito::ServerGuard, path: &str) -> Url {
    Url::parse(&server.url()).unwrap().join(path).unwrap()
}

#[tokio::test]
async fn follows_redirects_itself() {
    let mut server = mockito::Server::new_async().await;
    let start = server
        .mock("GET", "/start")
        .with_status(302)
        .with_header("location", "/final")
        .create_async()
        .await;
    let end = server
        .mock("GET", "/final")
        .with_status(200)
        .with_header("content-type", "text/html")
        .with_body("<html><head><title>Final</title></head></html>")
        .create_async()
        .await;

    let page = browser()
        .browse_to(&url(&server, "/start"), StatusCode::OK, HtmlPage::from_response)
        .await
        .unwrap();

    start.assert_async().await;
    end.assert_async().await;
    assert_eq!(page.result().len(), 2);
    assert_eq!(page.result().outcomes()[0].status(), StatusCode::FOUND);
    assert_eq!(page.result().outcomes()[0].reason_phrase(), "Found");
    assert_eq!(page.location(), &url(&server, "/final"));
    assert_eq!(page.title(), "Final");
}

#[tokio::test]
async fn wrong_final_status_is_reported() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/gone")
        .with_status(404)
        .create_async()
        .await;

    let err = browser()
        .browse_to(&url(&server, "/gone"), StatusCode::OK, HtmlPage::from_response)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        BrowserError::UnexpectedOutcome {
            actual: StatusCode::NOT_FOUND,
            ..
        }
    ));
}

#[tokio::test]
async fn cookies_persist_until_cleared() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/login")
        .with_status(200)
        .with_header("set-cookie", "session=abc; Path=/")
        .with_body("<p>in</p>")
        .create_async()
        .await;
    let with_cookie = server
        .mock("GET", "/account")
        .match_header("cookie", "session=abc")
        .with_status(200)
        .with_body("<p>account</p>")
        .create_async()
        .await;
    let without_cookie = server
        .mock("GET", "/account")
        .match_header("cookie", Matcher::Missing)
        .with_status(401)
        .create_async()
        .await;

    let browser = browser();
    browser
        .browse_to(&url(&server, "/login"), StatusCode::OK, HtmlPage::from_response)
        .await
        .unwrap();
    browser
        .browse_to(&url(&server, "/account"), StatusCode::OK, HtmlPage::from_response)
        .await
        .unwrap();

    browser.clear_cookies().unwrap();
    browser
        .browse_to(
            &url(&server, "/account"),
            StatusCode::UNAUTHORIZED,
            HtmlPage::from_response,
        )
        .await
        .unwrap();

    with_cookie.assert_async().await;
    without_cookie.assert_async().await;
}

#[tokio::test]
async fn form_posts_back_to_its_own_page() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/form/index")
        .with_status(200)
        .with_header("content-type", "text/html")
        .with_body(FORM)
        .create_async()
        .await;
    let post = server
        .mock("POST", "/form/index")
        .match_header("content-type", "application/x-www-form-urlencoded")
        .match_body(Matcher::AllOf(vec![
            Matcher::UrlEncoded("name".into(), "Jane".into()),
            Matcher::UrlEncoded("comment".into(), "Hello there".into()),
            Matcher::UrlEncoded("send".into(), "Send".into()),
        ]))
        .with_status(200)
        .with_body("<p>Thanks</p>")
        .create_async()
        .await;

    let browser = browser();
    let location = url(&server, "/form/index");
    let page = browser
        .browse_to(&location, StatusCode::OK, HtmlPage::from_response)
        .await
        .unwrap();

    let form = page.forms().unwrap()[0];
    form.field("comment")
        .unwrap()
        .as_field()
        .unwrap()
        .set_value("Hello there")
        .unwrap();
    let send = form.buttons().unwrap()[0];

    let result = form.submit(Some(&send)).await.unwrap();

    post.assert_async().await;
    assert_eq!(result.location(), &location);
    assert_eq!(result.status(), StatusCode::OK);
}
