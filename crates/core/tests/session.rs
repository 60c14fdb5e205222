// Login flow against the scripted router: candidate fallback, rejection vs.
// timeout, and reuse of the browser across authenticate calls.

mod fake_router;

use std::time::Duration;

use fake_router::{Rejection, RouterHandle, config, credentials};
use sigwatch::{AuthError, Credentials, SessionManager};
use tokio::time::Instant;

const PRIMARY: &str = "http://192.168.1.1";
const FALLBACK: &str = "http://zyxel.home";

#[tokio::test(start_paused = true)]
async fn falls_back_to_second_candidate() {
	let router = RouterHandle::new(&[FALLBACK]);
	let mut sessions = SessionManager::new(router.launcher(), config(&[PRIMARY, FALLBACK]));

	sessions.authenticate(&credentials()).await.unwrap();

	assert!(sessions.is_authenticated());
	assert_eq!(sessions.base_url().map(|u| u.as_str()), Some("http://zyxel.home/"));
	let state = router.lock();
	assert_eq!(
		state.opened,
		["http://192.168.1.1/login.html", "http://zyxel.home/login.html"]
	);
	assert_eq!(state.submits, 1);
}

#[tokio::test(start_paused = true)]
async fn all_candidates_unreachable() {
	let router = RouterHandle::new(&[]);
	let mut sessions = SessionManager::new(router.launcher(), config(&[PRIMARY, FALLBACK]));

	let err = sessions.authenticate(&credentials()).await.unwrap_err();

	match err {
		AuthError::AllEndpointsUnreachable { tried } => {
			assert_eq!(tried, ["http://192.168.1.1/", "http://zyxel.home/"]);
		}
		other => panic!("expected AllEndpointsUnreachable, got {other:?}"),
	}
	assert!(!sessions.is_authenticated());
	assert!(sessions.session().is_none());
}

#[tokio::test(start_paused = true)]
async fn page_without_login_form_skips_candidate() {
	let router = RouterHandle::new(&[PRIMARY]);
	router.lock().no_login_form = true;
	let mut sessions = SessionManager::new(router.launcher(), config(&[PRIMARY]));

	let err = sessions.authenticate(&credentials()).await.unwrap_err();

	assert!(matches!(err, AuthError::AllEndpointsUnreachable { .. }), "{err:?}");
	assert_eq!(router.lock().submits, 0);
}

#[tokio::test(start_paused = true)]
async fn error_indicator_is_invalid_credentials_immediately() {
	let router = RouterHandle::new(&[PRIMARY, FALLBACK]);
	let mut sessions = SessionManager::new(router.launcher(), config(&[PRIMARY, FALLBACK]));
	let start = Instant::now();

	let err = sessions
		.authenticate(&Credentials::new("admin", "wrong"))
		.await
		.unwrap_err();

	match err {
		AuthError::InvalidCredentials { url, reason } => {
			assert_eq!(url, "http://192.168.1.1/");
			assert_eq!(reason.as_deref(), Some("Incorrect username or password"));
		}
		other => panic!("expected InvalidCredentials, got {other:?}"),
	}
	// No waiting for the step timeout, no retry, no second candidate.
	assert!(start.elapsed() < Duration::from_secs(1));
	let state = router.lock();
	assert_eq!(state.submits, 1);
	assert_eq!(state.opened, ["http://192.168.1.1/login.html"]);
}

#[tokio::test(start_paused = true)]
async fn persisting_form_is_invalid_credentials_at_timeout() {
	let router = RouterHandle::new(&[PRIMARY]);
	router.lock().rejection = Rejection::FormStays;
	let mut sessions = SessionManager::new(router.launcher(), config(&[PRIMARY]));
	let start = Instant::now();

	let err = sessions
		.authenticate(&Credentials::new("admin", "wrong"))
		.await
		.unwrap_err();

	assert!(matches!(err, AuthError::InvalidCredentials { reason: None, .. }), "{err:?}");
	assert_eq!(start.elapsed(), Duration::from_secs(10));
	assert_eq!(router.lock().submits, 1);
}

#[tokio::test(start_paused = true)]
async fn ambiguous_page_times_out_after_retries() {
	let router = RouterHandle::new(&[PRIMARY]);
	router.lock().rejection = Rejection::Hang;
	let mut sessions = SessionManager::new(router.launcher(), config(&[PRIMARY]));

	let err = sessions
		.authenticate(&Credentials::new("admin", "wrong"))
		.await
		.unwrap_err();

	match err {
		AuthError::LoginTimeout { url, waited_ms } => {
			assert_eq!(url, "http://192.168.1.1/");
			assert_eq!(waited_ms, 10_000);
		}
		other => panic!("expected LoginTimeout, got {other:?}"),
	}
	// Default of two attempts on the same candidate.
	assert_eq!(router.lock().submits, 2);
}

#[tokio::test(start_paused = true)]
async fn timeout_on_first_candidate_moves_to_next() {
	let router = RouterHandle::new(&[PRIMARY, FALLBACK]);
	router.lock().rejection = Rejection::Hang;
	let mut cfg = config(&[PRIMARY, FALLBACK]);
	cfg.login_attempts = 1;
	let mut sessions = SessionManager::new(router.launcher(), cfg);

	let err = sessions
		.authenticate(&Credentials::new("admin", "wrong"))
		.await
		.unwrap_err();

	assert!(
		matches!(&err, AuthError::LoginTimeout { url, .. } if url == "http://zyxel.home/"),
		"{err:?}"
	);
	assert_eq!(router.lock().submits, 2);
}

#[tokio::test(start_paused = true)]
async fn repeated_authenticate_reuses_session_and_browser() {
	let router = RouterHandle::new(&[PRIMARY]);
	let mut sessions = SessionManager::new(router.launcher(), config(&[PRIMARY]));

	sessions.authenticate(&credentials()).await.unwrap();
	sessions.authenticate(&credentials()).await.unwrap();
	sessions.authenticate(&credentials()).await.unwrap();

	let state = router.lock();
	assert_eq!(state.launches, 1);
	assert_eq!(state.submits, 1);
}

#[tokio::test(start_paused = true)]
async fn authenticate_logs_in_again_after_router_logout() {
	let router = RouterHandle::new(&[PRIMARY]);
	let mut sessions = SessionManager::new(router.launcher(), config(&[PRIMARY]));
	sessions.authenticate(&credentials()).await.unwrap();

	{
		let mut state = router.lock();
		state.logged_in = false;
		state.current_url = "http://192.168.1.1/login.html".into();
	}
	sessions.authenticate(&credentials()).await.unwrap();

	let state = router.lock();
	assert_eq!(state.launches, 1);
	assert_eq!(state.submits, 2);
}

#[tokio::test(start_paused = true)]
async fn dead_browser_is_replaced() {
	let router = RouterHandle::new(&[PRIMARY]);
	let mut sessions = SessionManager::new(router.launcher(), config(&[PRIMARY]));
	sessions.authenticate(&credentials()).await.unwrap();

	router.lock().disconnect_next_inspect = true;
	sessions.authenticate(&credentials()).await.unwrap();

	let state = router.lock();
	assert_eq!(state.launches, 2);
	assert_eq!(state.closes, 1);
	assert!(sessions.is_authenticated());
}

#[tokio::test(start_paused = true)]
async fn invalidate_keeps_browser_and_close_releases_it() {
	let router = RouterHandle::new(&[PRIMARY]);
	let mut sessions = SessionManager::new(router.launcher(), config(&[PRIMARY]));
	sessions.authenticate(&credentials()).await.unwrap();

	sessions.invalidate();
	assert!(!sessions.is_authenticated());
	assert!(sessions.session().is_none());
	assert_eq!(router.lock().closes, 0);

	sessions.close().await.unwrap();
	assert_eq!(router.lock().closes, 1);
	// Closing twice is a no-op.
	sessions.close().await.unwrap();
	assert_eq!(router.lock().closes, 1);
}
