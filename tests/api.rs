//! Router-level tests over the in-memory store

use axum::{
    body::{to_bytes, Body},
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use chrono::Duration;
use serde_json::{json, Value};
use tower::ServiceExt;

use catalog_server::{
    api::router::create_router,
    config::AppConfig,
    models::{
        instance::today,
        user::{Permission, UserClaims},
    },
    repository::Repository,
    services::users::UsersService,
    AppState,
};

struct TestApp {
    router: Router,
    repository: Repository,
    config: AppConfig,
}

struct TestResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Value,
}

impl TestApp {
    fn new() -> Self {
        let config = AppConfig::default();
        let repository = Repository::in_memory();
        let router = create_router(AppState::new(config.clone(), repository.clone()));
        Self {
            router,
            repository,
            config,
        }
    }

    fn users(&self) -> UsersService {
        UsersService::new(self.repository.clone(), self.config.auth.clone())
    }

    /// Creates an account and returns its id with a bearer token
    async fn user(&self, username: &str, permissions: Vec<Permission>) -> (i32, String) {
        let user = self
            .users()
            .create_user(username, "secret", permissions.clone())
            .await
            .unwrap();
        let now = chrono::Utc::now().timestamp();
        let claims = UserClaims {
            sub: username.to_string(),
            user_id: user.id,
            permissions,
            exp: now + 3600,
            iat: now,
        };
        (user.id, claims.create_token(&self.config.auth.jwt_secret).unwrap())
    }

    async fn librarian(&self) -> String {
        self.user("librarian", Permission::ALL.to_vec()).await.1
    }

    async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.send(request).await
    }

    async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        TestResponse {
            status,
            headers,
            body,
        }
    }

    async fn get(&self, uri: &str, token: Option<&str>) -> TestResponse {
        self.request(Method::GET, uri, token, None).await
    }

    async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> TestResponse {
        self.request(Method::POST, uri, token, Some(body)).await
    }

    async fn create_book(&self, token: &str, title: &str, isbn: &str) -> Value {
        let response = self
            .post(
                "/catalog/book/create/",
                Some(token),
                json!({
                    "title": title,
                    "summary": "A summary",
                    "isbn": isbn,
                    "author_id": null,
                    "language_id": null,
                    "genre_ids": []
                }),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
        response.body
    }

    async fn create_instance(&self, token: &str, body: Value) -> Value {
        let response = self
            .post("/catalog/bookinstance/create/", Some(token), body)
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
        response.body
    }
}

fn location(response: &TestResponse) -> &str {
    response
        .headers
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

fn date(offset_days: i64) -> String {
    (today() + Duration::days(offset_days)).to_string()
}

#[tokio::test]
async fn test_health_and_root_redirect() {
    let app = TestApp::new();

    let health = app.get("/health", None).await;
    assert_eq!(health.status, StatusCode::OK);
    assert_eq!(health.body["status"], "healthy");

    let ready = app.get("/ready", None).await;
    assert_eq!(ready.status, StatusCode::OK);

    let root = app.get("/", None).await;
    assert_eq!(root.status, StatusCode::PERMANENT_REDIRECT);
    assert_eq!(location(&root), "/catalog/");
}

#[tokio::test]
async fn test_dashboard_counts_visits_per_session() {
    let app = TestApp::new();

    let first = app.get("/catalog/", None).await;
    assert_eq!(first.status, StatusCode::OK);
    assert_eq!(first.body["num_visits"], 0);
    assert_eq!(first.body["is_authenticated"], false);

    let cookie = first
        .headers
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .unwrap()
        .to_string();

    for expected in 1..=2 {
        let request = Request::builder()
            .uri("/catalog/")
            .header(header::COOKIE, &cookie)
            .body(Body::empty())
            .unwrap();
        let response = app.send(request).await;
        assert_eq!(response.body["num_visits"], expected);
    }

    // A request without the cookie starts a new session
    let fresh = app.get("/catalog/", None).await;
    assert_eq!(fresh.body["num_visits"], 0);
}

#[tokio::test]
async fn test_dashboard_reports_catalog_counts() {
    let app = TestApp::new();
    let token = app.librarian().await;

    let book = app.create_book(&token, "Salt and Ember", "9780000000001").await;
    app.create_book(&token, "Anderson Notes", "9780000000002").await;
    app.create_instance(
        &token,
        json!({"book_id": book["id"], "imprint": "First", "status": "available"}),
    )
    .await;
    app.create_instance(
        &token,
        json!({"book_id": book["id"], "imprint": "Second", "status": "maintenance"}),
    )
    .await;

    let dashboard = app.get("/catalog/", Some(&token)).await;
    assert_eq!(dashboard.body["num_books"], 2);
    assert_eq!(dashboard.body["num_instances"], 2);
    assert_eq!(dashboard.body["num_instances_available"], 1);
    assert_eq!(dashboard.body["num_books_with_and"], 1);
    assert_eq!(dashboard.body["is_authenticated"], true);
}

#[tokio::test]
async fn test_guarded_endpoints_require_token_and_permission() {
    let app = TestApp::new();
    let (_, patron) = app.user("patron", vec![]).await;
    let body = json!({"title": "T", "summary": "S", "isbn": "1", "genre_ids": []});

    let anonymous = app.post("/catalog/book/create/", None, body.clone()).await;
    assert_eq!(anonymous.status, StatusCode::UNAUTHORIZED);

    let bad_token = app
        .post("/catalog/book/create/", Some("not-a-jwt"), body.clone())
        .await;
    assert_eq!(bad_token.status, StatusCode::UNAUTHORIZED);

    let forbidden = app.post("/catalog/book/create/", Some(&patron), body).await;
    assert_eq!(forbidden.status, StatusCode::FORBIDDEN);

    let mine = app.get("/catalog/mybooks/", Some(&patron)).await;
    assert_eq!(mine.status, StatusCode::OK);

    let everyone = app.get("/catalog/borrowed/", Some(&patron)).await;
    assert_eq!(everyone.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_permission_is_checked_before_lookup() {
    let app = TestApp::new();
    let (_, books_only) = app.user("cataloguer", vec![Permission::CanAffectBooks]).await;
    let (_, authors_only) = app.user("archivist", vec![Permission::CanAffectAuthors]).await;

    let forbidden = app
        .post("/catalog/author/9999/delete/", Some(&books_only), json!({}))
        .await;
    assert_eq!(forbidden.status, StatusCode::FORBIDDEN);

    let missing = app
        .post("/catalog/author/9999/delete/", Some(&authors_only), json!({}))
        .await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);

    let renew = app
        .get(
            "/catalog/book/00000000-0000-0000-0000-000000000000/renew/",
            Some(&books_only),
        )
        .await;
    assert_eq!(renew.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_book_listing_pagination() {
    let app = TestApp::new();
    let token = app.librarian().await;

    let empty = app.get("/catalog/books/", None).await;
    assert_eq!(empty.status, StatusCode::OK);
    assert_eq!(empty.body["num_pages"], 1);
    assert_eq!(app.get("/catalog/books/?page=2", None).await.status, StatusCode::NOT_FOUND);

    for n in 0..11 {
        app.create_book(&token, &format!("Book {:02}", n), &format!("97800000001{:02}", n))
            .await;
    }

    let first = app.get("/catalog/books/", None).await;
    assert_eq!(first.body["items"].as_array().unwrap().len(), 10);
    assert_eq!(first.body["items"][0]["title"], "Book 00");
    assert_eq!(first.body["num_pages"], 2);

    let second = app.get("/catalog/books/?page=2", None).await;
    assert_eq!(second.body["items"].as_array().unwrap().len(), 1);
    assert_eq!(second.body["items"][0]["title"], "Book 10");

    assert_eq!(app.get("/catalog/books/?page=3", None).await.status, StatusCode::NOT_FOUND);
    assert_eq!(app.get("/catalog/books/?page=0", None).await.status, StatusCode::NOT_FOUND);

    let huge = format!("/catalog/books/?page={}", i64::MAX);
    assert_eq!(app.get(&huge, None).await.status, StatusCode::NOT_FOUND);
    let huge = format!("/catalog/bookinstances/?page={}", i64::MAX);
    assert_eq!(app.get(&huge, None).await.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_duplicate_isbn_is_a_field_error() {
    let app = TestApp::new();
    let token = app.librarian().await;
    app.create_book(&token, "Original", "9781234567897").await;

    let duplicate = app
        .post(
            "/catalog/book/create/",
            Some(&token),
            json!({"title": "Copycat", "summary": "S", "isbn": "9781234567897", "genre_ids": []}),
        )
        .await;
    assert_eq!(duplicate.status, StatusCode::BAD_REQUEST);
    assert_eq!(duplicate.body["fields"]["isbn"][0]["code"], "unique");
}

#[tokio::test]
async fn test_book_with_copies_cannot_be_deleted() {
    let app = TestApp::new();
    let token = app.librarian().await;
    let book = app.create_book(&token, "Kept", "9780000000003").await;
    let copy = app
        .create_instance(
            &token,
            json!({"book_id": book["id"], "imprint": "Only copy", "status": "available"}),
        )
        .await;

    let book_path = format!("/catalog/book/{}/delete/", book["id"]);
    let refused = app.post(&book_path, Some(&token), json!({})).await;
    assert_eq!(refused.status, StatusCode::CONFLICT);

    let copy_path = format!("/catalog/bookinstance/{}/delete/", copy["id"].as_str().unwrap());
    let removed = app.post(&copy_path, Some(&token), json!({})).await;
    assert_eq!(removed.status, StatusCode::NO_CONTENT);

    let deleted = app.post(&book_path, Some(&token), json!({})).await;
    assert_eq!(deleted.status, StatusCode::NO_CONTENT);
    let gone = app.get(&format!("/catalog/book/{}", book["id"]), None).await;
    assert_eq!(gone.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_author_delete_clears_book_author() {
    let app = TestApp::new();
    let token = app.librarian().await;

    let author = app
        .post(
            "/catalog/author/create/",
            Some(&token),
            json!({
                "first_name": "Mary",
                "last_name": "Shelley",
                "date_of_birth": "1797-08-30",
                "date_of_death": "1851-02-01"
            }),
        )
        .await;
    assert_eq!(author.status, StatusCode::CREATED);
    assert_eq!(author.body["display_name"], "Shelley, Mary");

    let book = app
        .post(
            "/catalog/book/create/",
            Some(&token),
            json!({
                "title": "Frankenstein",
                "summary": "S",
                "isbn": "9780000000004",
                "author_id": author.body["id"],
                "genre_ids": []
            }),
        )
        .await;
    assert_eq!(book.body["author"]["id"], author.body["id"]);

    let detail = app
        .get(&format!("/catalog/author/{}", author.body["id"]), None)
        .await;
    assert_eq!(detail.body["books"][0]["title"], "Frankenstein");

    let deleted = app
        .post(
            &format!("/catalog/author/{}/delete/", author.body["id"]),
            Some(&token),
            json!({}),
        )
        .await;
    assert_eq!(deleted.status, StatusCode::NO_CONTENT);

    let orphan = app
        .get(&format!("/catalog/book/{}", book.body["id"]), None)
        .await;
    assert_eq!(orphan.status, StatusCode::OK);
    assert!(orphan.body["author"].is_null());
}

#[tokio::test]
async fn test_author_death_before_birth_is_rejected() {
    let app = TestApp::new();
    let token = app.librarian().await;

    let response = app
        .post(
            "/catalog/author/create/",
            Some(&token),
            json!({
                "first_name": "Time",
                "last_name": "Traveller",
                "date_of_birth": "1900-01-01",
                "date_of_death": "1850-01-01"
            }),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["fields"]["__all__"][0]["code"], "death_before_birth");
}

#[tokio::test]
async fn test_renewal_window() {
    let app = TestApp::new();
    let token = app.librarian().await;
    let (borrower, _) = app.user("reader", vec![]).await;
    let book = app.create_book(&token, "Renewable", "9780000000005").await;
    let copy = app
        .create_instance(
            &token,
            json!({
                "book_id": book["id"],
                "imprint": "Loan copy",
                "status": "on_loan",
                "due_back": date(2),
                "borrower_id": borrower
            }),
        )
        .await;
    let path = format!("/catalog/book/{}/renew/", copy["id"].as_str().unwrap());

    let form = app.get(&path, Some(&token)).await;
    assert_eq!(form.status, StatusCode::OK);
    assert_eq!(form.body["renewal_date"], date(21));

    let past = app.post(&path, Some(&token), json!({"renewal_date": date(-1)})).await;
    assert_eq!(past.status, StatusCode::BAD_REQUEST);
    assert_eq!(past.body["fields"]["renewal_date"][0]["code"], "renewal_in_past");
    assert_eq!(past.body["form"]["renewal_date"], date(21));

    let far = app.post(&path, Some(&token), json!({"renewal_date": date(29)})).await;
    assert_eq!(far.status, StatusCode::BAD_REQUEST);
    assert_eq!(far.body["fields"]["renewal_date"][0]["code"], "renewal_too_far");

    let limit = app.post(&path, Some(&token), json!({"renewal_date": date(28)})).await;
    assert_eq!(limit.status, StatusCode::SEE_OTHER);
    assert_eq!(location(&limit), "/catalog/borrowed/");

    let renewed = app
        .get(&format!("/catalog/bookinstance/{}", copy["id"].as_str().unwrap()), None)
        .await;
    assert_eq!(renewed.body["due_back"], date(28));
    assert_eq!(renewed.body["borrower"]["id"], borrower);

    let same_day = app.post(&path, Some(&token), json!({"renewal_date": date(0)})).await;
    assert_eq!(same_day.status, StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn test_renewing_copy_not_on_loan_is_a_conflict() {
    let app = TestApp::new();
    let token = app.librarian().await;
    let book = app.create_book(&token, "Shelf Only", "9780000000010").await;
    let copy = app
        .create_instance(
            &token,
            json!({"book_id": book["id"], "imprint": "Shelf copy", "status": "available"}),
        )
        .await;
    let id = copy["id"].as_str().unwrap();

    let renewed = app
        .post(
            &format!("/catalog/book/{}/renew/", id),
            Some(&token),
            json!({"renewal_date": date(5)}),
        )
        .await;
    assert_eq!(renewed.status, StatusCode::CONFLICT);

    let unchanged = app.get(&format!("/catalog/bookinstance/{}", id), None).await;
    assert_eq!(unchanged.body["status"], "available");
    assert!(unchanged.body["due_back"].is_null());

    // The copy's own form still saves as is
    let path = format!("/catalog/bookinstance/{}/update/", id);
    let form = app.get(&path, Some(&token)).await;
    assert_eq!(form.status, StatusCode::OK);
    let saved = app.post(&path, Some(&token), form.body).await;
    assert_eq!(saved.status, StatusCode::OK, "{}", saved.body);
}

#[tokio::test]
async fn test_borrowed_listings_across_borrowers() {
    let app = TestApp::new();
    let token = app.librarian().await;
    let (alice, alice_token) = app.user("alice", vec![]).await;
    let (bob, bob_token) = app.user("bob", vec![]).await;
    let book = app.create_book(&token, "Popular", "9780000000011").await;

    let mut loans = Vec::new();
    for (borrower, due_in) in [(alice, 9), (bob, 3), (alice, 1), (bob, 14)] {
        let copy = app
            .create_instance(
                &token,
                json!({
                    "book_id": book["id"],
                    "imprint": format!("Due in {}", due_in),
                    "status": "on_loan",
                    "due_back": date(due_in),
                    "borrower_id": borrower
                }),
            )
            .await;
        loans.push((borrower, due_in, copy["id"].as_str().unwrap().to_string()));
    }
    app.create_instance(
        &token,
        json!({"book_id": book["id"], "imprint": "On the shelf", "status": "available"}),
    )
    .await;

    let all = app.get("/catalog/borrowed/", Some(&token)).await;
    assert_eq!(all.status, StatusCode::OK);
    assert_eq!(all.body["total"], 4);
    let due_dates: Vec<&str> = all.body["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["due_back"].as_str().unwrap())
        .collect();
    assert_eq!(due_dates, vec![date(1), date(3), date(9), date(14)]);

    for (borrower, borrower_token, username) in
        [(alice, &alice_token, "alice"), (bob, &bob_token, "bob")]
    {
        let mine = app.get("/catalog/mybooks/", Some(borrower_token)).await;
        assert_eq!(mine.status, StatusCode::OK);
        let items = mine.body["items"].as_array().unwrap();
        assert_eq!(items.len(), 2);
        assert!(items
            .iter()
            .all(|item| item["borrower"]["username"] == username));

        let mut expected: Vec<(i64, &str)> = loans
            .iter()
            .filter(|(b, _, _)| *b == borrower)
            .map(|(_, due_in, id)| (*due_in, id.as_str()))
            .collect();
        expected.sort();
        let ids: Vec<&str> = items.iter().map(|item| item["id"].as_str().unwrap()).collect();
        assert_eq!(ids, expected.iter().map(|(_, id)| *id).collect::<Vec<_>>());
    }
}

#[tokio::test]
async fn test_lend_and_return() {
    let app = TestApp::new();
    let token = app.librarian().await;
    let (borrower, borrower_token) = app.user("reader", vec![]).await;
    let book = app.create_book(&token, "Circulating", "9780000000006").await;
    let copy = app
        .create_instance(
            &token,
            json!({"book_id": book["id"], "imprint": "Shelf copy", "status": "available"}),
        )
        .await;
    let id = copy["id"].as_str().unwrap();

    let lent = app
        .post(
            &format!("/catalog/bookinstance/{}/lend/", id),
            Some(&token),
            json!({"borrower_id": borrower}),
        )
        .await;
    assert_eq!(lent.status, StatusCode::OK);
    assert_eq!(lent.body["status"], "on_loan");
    assert_eq!(lent.body["borrower"]["username"], "reader");
    assert_eq!(lent.body["due_back"], date(21));
    assert_eq!(lent.body["is_overdue"], false);

    let again = app
        .post(
            &format!("/catalog/bookinstance/{}/lend/", id),
            Some(&token),
            json!({"borrower_id": borrower}),
        )
        .await;
    assert_eq!(again.status, StatusCode::CONFLICT);

    let mine = app.get("/catalog/mybooks/", Some(&borrower_token)).await;
    assert_eq!(mine.body["total"], 1);
    assert_eq!(mine.body["items"][0]["id"], id);

    let all = app.get("/catalog/borrowed/", Some(&token)).await;
    assert_eq!(all.body["total"], 1);

    let returned = app
        .post(&format!("/catalog/bookinstance/{}/return/", id), Some(&token), json!({}))
        .await;
    assert_eq!(returned.status, StatusCode::OK);
    assert_eq!(returned.body["status"], "available");
    assert!(returned.body["borrower"].is_null());
    assert!(returned.body["due_back"].is_null());

    let mine = app.get("/catalog/mybooks/", Some(&borrower_token)).await;
    assert_eq!(mine.body["total"], 0);
}

#[tokio::test]
async fn test_lend_rejects_unknown_borrower_and_far_due_date() {
    let app = TestApp::new();
    let token = app.librarian().await;
    let (borrower, _) = app.user("reader", vec![]).await;
    let book = app.create_book(&token, "Strict", "9780000000007").await;
    let copy = app
        .create_instance(
            &token,
            json!({"book_id": book["id"], "imprint": "Copy", "status": "available"}),
        )
        .await;
    let path = format!("/catalog/bookinstance/{}/lend/", copy["id"].as_str().unwrap());

    let unknown = app
        .post(&path, Some(&token), json!({"borrower_id": 4242}))
        .await;
    assert_eq!(unknown.status, StatusCode::BAD_REQUEST);
    assert_eq!(unknown.body["fields"]["borrower_id"][0]["code"], "does_not_exist");

    let far = app
        .post(&path, Some(&token), json!({"borrower_id": borrower, "due_back": date(40)}))
        .await;
    assert_eq!(far.status, StatusCode::BAD_REQUEST);
    assert_eq!(far.body["fields"]["due_back"][0]["code"], "renewal_too_far");
}

#[tokio::test]
async fn test_loan_fields_require_on_loan_status() {
    let app = TestApp::new();
    let token = app.librarian().await;
    let book = app.create_book(&token, "Shelved", "9780000000008").await;

    let response = app
        .post(
            "/catalog/bookinstance/create/",
            Some(&token),
            json!({
                "book_id": book["id"],
                "imprint": "Copy",
                "status": "available",
                "due_back": date(3)
            }),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        response.body["fields"]["__all__"][0]["code"],
        "loan_fields_without_loan"
    );
}

#[tokio::test]
async fn test_login_and_me() {
    let app = TestApp::new();
    app.users()
        .create_user("marian", "hunter2", vec![Permission::CanMarkReturned])
        .await
        .unwrap();

    let wrong = app
        .post("/accounts/login/", None, json!({"username": "marian", "password": "nope"}))
        .await;
    assert_eq!(wrong.status, StatusCode::UNAUTHORIZED);

    let unknown = app
        .post("/accounts/login/", None, json!({"username": "nobody", "password": "nope"}))
        .await;
    assert_eq!(unknown.status, StatusCode::UNAUTHORIZED);

    let login = app
        .post(
            "/accounts/login/",
            None,
            json!({"username": "marian", "password": "hunter2"}),
        )
        .await;
    assert_eq!(login.status, StatusCode::OK);
    assert_eq!(login.body["token_type"], "Bearer");
    let token = login.body["token"].as_str().unwrap().to_string();

    let me = app.get("/accounts/me/", Some(&token)).await;
    assert_eq!(me.status, StatusCode::OK);
    assert_eq!(me.body["username"], "marian");
    assert_eq!(me.body["permissions"], json!(["can_mark_returned"]));
}

#[tokio::test]
async fn test_genre_delete_removes_it_from_books() {
    let app = TestApp::new();
    let token = app.librarian().await;

    let genre = app
        .post("/catalog/genre/create/", Some(&token), json!({"name": "Gothic"}))
        .await;
    assert_eq!(genre.status, StatusCode::CREATED);

    let book = app
        .post(
            "/catalog/book/create/",
            Some(&token),
            json!({
                "title": "Dracula",
                "summary": "S",
                "isbn": "9780000000009",
                "genre_ids": [genre.body["id"]]
            }),
        )
        .await;
    assert_eq!(book.body["display_genre"], "Gothic");

    let deleted = app
        .post(
            &format!("/catalog/genre/{}/delete/", genre.body["id"]),
            Some(&token),
            json!({}),
        )
        .await;
    assert_eq!(deleted.status, StatusCode::NO_CONTENT);

    let detail = app
        .get(&format!("/catalog/book/{}", book.body["id"]), None)
        .await;
    assert_eq!(detail.body["genres"], json!([]));
    assert_eq!(detail.body["display_genre"], "");
}
