mod common;

use commitflow::config::Config;
use commitflow::error::FlowError;
use commitflow::flow::{FlowOutcome, RunOptions, Session, StopReason};
use commitflow::git::ShellRunner;
use commitflow::store::HistoryCache;

use common::{Answer, ScriptedPrompter, TestRepo, template_config, temp_test_dir};

const FEAT: usize = 0;
const FIX: usize = 1;

fn run(config: &Config, repo: &TestRepo, options: &RunOptions, prompter: &ScriptedPrompter) -> Result<FlowOutcome, FlowError> {
    let group = config.commit_group(&options.group).unwrap();
    let runner = ShellRunner::in_dir(repo.path());
    Session::new(config, group, options, &runner, prompter).run()
}

#[test]
fn test_commit_and_push_then_reuse_previous() {
    let state = temp_test_dir();
    let config = template_config(state.path());
    let repo = TestRepo::new();
    repo.commit_file("app.txt", "v1\n", "chore: initial");
    let _origin = repo.add_bare_origin();

    repo.write_file("app.txt", "v2\n");
    repo.write_file("health.txt", "ok\n");

    let prompter = ScriptedPrompter::new([
        Answer::Multi(vec![0, 1]),
        Answer::Select(FEAT),
        Answer::Text("api"),
        Answer::Text("add health endpoint."),
        Answer::Text("42"),
        Answer::Select(0),
        Answer::Confirm(true),
        Answer::Text("Jane Doe"),
        Answer::Text("jane@x.com"),
    ]);
    let outcome = run(&config, &repo, &RunOptions::default(), &prompter).unwrap();

    let expected = "feat(api): add health endpoint\n\nCloses: #42\nCo-authored-by: Jane Doe <jane@x.com>";
    assert_eq!(
        outcome,
        FlowOutcome::Committed {
            message: expected.to_string()
        }
    );
    assert_eq!(repo.head_message().trim_end(), expected);
    assert!(repo.staged_paths().is_empty());

    // Second commit replays refs and co-authors from history
    repo.write_file("app.txt", "v3\n");
    let prompter = ScriptedPrompter::new([
        Answer::Multi(vec![0]),
        Answer::Select(FIX),
        Answer::Text(""),
        Answer::Text("Handle timeout"),
    ]);
    let options = RunOptions {
        reuse_previous: true,
        ..Default::default()
    };
    run(&config, &repo, &options, &prompter).unwrap();

    assert_eq!(
        repo.head_message().trim_end(),
        "fix: handle timeout\n\nCloses: #42\nCo-authored-by: Jane Doe <jane@x.com>"
    );

    let history = HistoryCache::load(config.history_path(), config.commit.history_size);
    assert_eq!(history.len(), 2);
    assert_eq!(history.latest().unwrap().spec.message, "handle timeout");
}

#[test]
fn test_deselected_staged_file_is_restored() {
    let state = temp_test_dir();
    let config = template_config(state.path());
    let repo = TestRepo::new();
    repo.commit_file("a.txt", "1\n", "chore: initial");
    let _origin = repo.add_bare_origin();

    repo.write_file("a.txt", "2\n");
    repo.write_file("b.txt", "new\n");
    repo.stage("b.txt");

    // Unstaged a.txt comes first, then the already staged b.txt
    let prompter = ScriptedPrompter::new([
        Answer::Multi(vec![0]),
        Answer::Select(FIX),
        Answer::Text("Only a"),
    ]);
    let options = RunOptions {
        group: "simple".to_string(),
        ..Default::default()
    };
    run(&config, &repo, &options, &prompter).unwrap();

    let head = repo.repo.head().unwrap().peel_to_commit().unwrap();
    let tree = head.tree().unwrap();
    assert!(tree.get_path(std::path::Path::new("b.txt")).is_err());
    assert_eq!(repo.head_message().trim_end(), "fix: only a");
}

#[test]
fn test_clean_repository_stops() {
    let state = temp_test_dir();
    let config = template_config(state.path());
    let repo = TestRepo::new();
    repo.commit_file("a.txt", "1\n", "chore: initial");

    let prompter = ScriptedPrompter::new([]);
    let outcome = run(&config, &repo, &RunOptions::default(), &prompter).unwrap();

    assert_eq!(outcome, FlowOutcome::Stopped(StopReason::NothingToCommit));
    assert!(prompter.asked().is_empty());
}

#[test]
fn test_debug_mode_changes_nothing() {
    let state = temp_test_dir();
    let config = template_config(state.path());
    let repo = TestRepo::new();
    let initial = repo.commit_file("a.txt", "1\n", "chore: initial");
    repo.write_file("a.txt", "2\n");

    let prompter = ScriptedPrompter::new([
        Answer::Multi(vec![0]),
        Answer::Select(FIX),
        Answer::Text("try it"),
    ]);
    let options = RunOptions {
        debug: true,
        add_all: false,
        group: "simple".to_string(),
        ..Default::default()
    };
    let outcome = run(&config, &repo, &options, &prompter).unwrap();

    assert!(matches!(outcome, FlowOutcome::Committed { .. }));
    assert_eq!(repo.head_id(), initial);
    assert!(repo.staged_paths().is_empty());
    assert!(!config.history_path().exists());
}

#[test]
fn test_add_all_commits_everything_without_selection() {
    let state = temp_test_dir();
    let config = template_config(state.path());
    let repo = TestRepo::new();
    repo.commit_file("a.txt", "1\n", "chore: initial");
    let _origin = repo.add_bare_origin();
    repo.write_file("a.txt", "2\n");
    repo.write_file("nested/b.txt", "new\n");

    let prompter = ScriptedPrompter::new([Answer::Select(FEAT), Answer::Text("add b")]);
    let options = RunOptions {
        add_all: true,
        group: "simple".to_string(),
        ..Default::default()
    };
    run(&config, &repo, &options, &prompter).unwrap();

    let head = repo.repo.head().unwrap().peel_to_commit().unwrap();
    assert!(head.tree().unwrap().get_path(std::path::Path::new("nested/b.txt")).is_ok());
    assert_eq!(repo.head_message().trim_end(), "feat: add b");
}

#[test]
fn test_push_without_remote_fails_after_commit() {
    let state = temp_test_dir();
    let config = template_config(state.path());
    let repo = TestRepo::new();
    repo.commit_file("a.txt", "1\n", "chore: initial");
    repo.write_file("a.txt", "2\n");

    let prompter = ScriptedPrompter::new([
        Answer::Multi(vec![0]),
        Answer::Select(FIX),
        Answer::Text("local only"),
    ]);
    let options = RunOptions {
        group: "simple".to_string(),
        ..Default::default()
    };
    let result = run(&config, &repo, &options, &prompter);

    assert!(matches!(result, Err(FlowError::PushFailed(_))));
    assert_eq!(repo.head_message().trim_end(), "fix: local only");
    assert_eq!(HistoryCache::load(config.history_path(), 15).len(), 1);
}
