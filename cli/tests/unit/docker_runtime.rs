//! Unit tests for the docker CLI adapter, using a recording command runner.

#![allow(clippy::expect_used)]

use datacats_cli::application::ports::ContainerRuntime;
use datacats_cli::domain::{
    Attach, ContainerSpec, EphemeralCommand, ImageConfig, RuntimeError, Stack, DirectoryLayout,
};
use datacats_cli::infra::docker::DockerRuntime;
use datacats_common::ContainerRole;

use crate::helpers::{FixedSecrets, Sandbox, err_output, ok_output};
use crate::mocks::RecordingRunner;

#[tokio::test]
async fn test_start_named_passes_secrets_through_environment_only() {
    let sb = Sandbox::new();
    let project = sb.project("myportal");
    let layout = DirectoryLayout::for_project(&project);
    let images = ImageConfig::default();
    let spec = Stack::new(&images, "myportal", &layout).data_container(&FixedSecrets::set());
    let runtime = DockerRuntime::new("docker", RecordingRunner::default());

    runtime.start_named(&spec).await.expect("start");

    let calls = runtime_invocations(&runtime);
    assert_eq!(calls.len(), 1);
    let call = &calls[0];
    assert_eq!(call.program, "docker");
    assert_eq!(&call.args[..4], ["run", "-d", "--name", "datacats_data_myportal"]);
    assert_eq!(call.args.last().map(String::as_str), Some("datacats/data"));
    for secret in ["PPPP", "CCCC", "RRRR", "WWWW"] {
        assert!(
            !call.args.iter().any(|a| a.contains(secret)),
            "secret leaked into argv: {:?}",
            call.args
        );
    }
    assert!(call.args.windows(2).any(|w| w == ["-e", "POSTGRES_PASSWORD"]));
    assert!(
        call.envs
            .contains(&("POSTGRES_PASSWORD".to_string(), "P".repeat(16)))
    );
}

#[tokio::test]
async fn test_start_named_failure_is_start_failed() {
    let runner = RecordingRunner::with_outputs([err_output(
        125,
        b"Conflict. The container name \"/datacats_web_x\" is already in use",
    )]);
    let runtime = DockerRuntime::new("docker", runner);
    let spec = ContainerSpec::new(ContainerRole::Web, "x", "datacats/web");

    let err = runtime.start_named(&spec).await.expect_err("conflict");
    assert!(matches!(
        err.downcast_ref::<RuntimeError>(),
        Some(RuntimeError::StartFailed { stderr, .. }) if stderr.contains("already in use")
    ));
}

#[tokio::test]
async fn test_run_ephemeral_reports_exit_code() {
    let runner = RecordingRunner::with_outputs([err_output(3, b"boom")]);
    let runtime = DockerRuntime::new("podman", runner);
    let cmd = EphemeralCommand::new("datacats/web", ["/bin/true"]).ro("/h/venv", "/usr/lib/ckan");

    let outcome = runtime.run_ephemeral(&cmd).await.expect("runs");

    assert_eq!(outcome.exit_code, Some(3));
    assert_eq!(outcome.stderr, "boom");
    let call = &runtime_invocations(&runtime)[0];
    assert_eq!(call.program, "podman");
    assert_eq!(call.args, [
        "run",
        "--rm",
        "-v",
        "/h/venv:/usr/lib/ckan:ro",
        "datacats/web",
        "/bin/true"
    ]);
}

#[tokio::test]
async fn test_run_interactive_allocates_terminal() {
    let runtime = DockerRuntime::new("docker", RecordingRunner::with_status(1));
    let cmd = EphemeralCommand::new("datacats/web", ["paster", "sysadmin", "add", "admin"]);

    let outcome = runtime.run_interactive(&cmd).await.expect("runs");

    assert_eq!(outcome.exit_code, Some(1));
    let call = &runtime_invocations(&runtime)[0];
    assert!(call.interactive);
    assert_eq!(&call.args[..3], ["run", "--rm", "-it"]);
}

#[tokio::test]
async fn test_inspect_missing_container_is_none() {
    let runner = RecordingRunner::with_outputs([err_output(
        1,
        b"Error: No such container: datacats_web_x",
    )]);
    let runtime = DockerRuntime::new("docker", runner);

    assert!(runtime.inspect("datacats_web_x").await.expect("ok").is_none());
    let call = &runtime_invocations(&runtime)[0];
    assert_eq!(call.args, ["inspect", "--type", "container", "datacats_web_x"]);
}

#[tokio::test]
async fn test_inspect_parses_address() {
    let json = br#"[{"Name":"/datacats_web_x","State":{"Running":true},"NetworkSettings":{"IPAddress":"172.17.0.5"}}]"#;
    let runtime = DockerRuntime::new("docker", RecordingRunner::with_outputs([ok_output(json)]));

    let info = runtime
        .inspect("datacats_web_x")
        .await
        .expect("ok")
        .expect("present");
    assert_eq!(info.name, "datacats_web_x");
    assert_eq!(info.ip_address, "172.17.0.5");
}

#[tokio::test]
async fn test_inspect_other_failure_is_error() {
    let runner = RecordingRunner::with_outputs([err_output(
        1,
        b"Cannot connect to the Docker daemon",
    )]);
    let runtime = DockerRuntime::new("docker", runner);

    let err = runtime.inspect("datacats_web_x").await.expect_err("daemon down");
    assert!(matches!(
        err.downcast_ref::<RuntimeError>(),
        Some(RuntimeError::InspectFailed { .. })
    ));
}

#[tokio::test]
async fn test_remove_is_idempotent() {
    let runner = RecordingRunner::with_outputs([err_output(
        1,
        b"Error: No such container: datacats_data_x",
    )]);
    let runtime = DockerRuntime::new("docker", runner);

    runtime.remove("datacats_data_x").await.expect("absent is fine");
    let call = &runtime_invocations(&runtime)[0];
    assert_eq!(call.args, ["rm", "-f", "datacats_data_x"]);
}

#[tokio::test]
async fn test_remove_other_failure_is_error() {
    let runner = RecordingRunner::with_outputs([err_output(1, b"device or resource busy")]);
    let runtime = DockerRuntime::new("docker", runner);

    let err = runtime.remove("datacats_data_x").await.expect_err("busy");
    assert!(matches!(
        err.downcast_ref::<RuntimeError>(),
        Some(RuntimeError::RemoveFailed { .. })
    ));
}

fn runtime_invocations(
    runtime: &DockerRuntime<RecordingRunner>,
) -> Vec<crate::mocks::Invocation> {
    runtime.runner().invocations()
}
