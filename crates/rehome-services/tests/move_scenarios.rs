//! End-to-end move scenarios against real temporary projects

use pretty_assertions::assert_eq;
use rehome_config::AppConfig;
use rehome_foundation::{MoveSpec, RehomeError};
use rehome_services::services::move_service::{analyze, rewrite};
use rehome_services::{list_project_files, DiscoveryOptions, MoveOptions, MoveService};
use rehome_test_support::TestWorkspace;

fn service(workspace: &TestWorkspace) -> MoveService {
    MoveService::new(workspace.path(), &AppConfig::default())
}

fn apply() -> MoveOptions {
    MoveOptions { dry_run: false }
}

fn sources(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[tokio::test]
async fn alias_import_in_vue_component_follows_moved_file() {
    let workspace = TestWorkspace::with_repository_boundary();
    workspace.create_tsconfig_with_paths(&[("@/*", "src/*")]);
    workspace.create_file("src/components/Button.vue", "<template><button /></template>\n");
    workspace.create_file(
        "src/pages/Home.vue",
        "<template>\n  <Button />\n</template>\n\n<script setup lang=\"ts\">\nimport Button from '@/components/Button.vue'\nimport { ref } from 'vue'\n</script>\n",
    );

    let report = service(&workspace)
        .move_paths(
            &sources(&["src/components/Button.vue"]),
            "src/shared/Button.vue",
            &apply(),
        )
        .await
        .unwrap();

    assert_eq!(
        workspace.read_file("src/pages/Home.vue"),
        "<template>\n  <Button />\n</template>\n\n<script setup lang=\"ts\">\nimport Button from '@/shared/Button.vue'\nimport { ref } from 'vue'\n</script>\n"
    );
    assert!(workspace.file_exists("src/shared/Button.vue"));
    assert!(!workspace.file_exists("src/components/Button.vue"));

    let home_edits = report.edits_for(&workspace.absolute_path("src/pages/Home.vue"));
    assert_eq!(home_edits.len(), 1);
    assert_eq!(home_edits[0].updated_count, 1);
    assert_eq!(home_edits[0].changes[0].line, 6);
    assert_eq!(report.imports_updated, 1);
}

#[tokio::test]
async fn relative_imports_keep_extensionless_style() {
    let workspace = TestWorkspace::with_repository_boundary();
    workspace.create_file("src/pages/utils.ts", "export const u = 1\n");
    workspace.create_file("src/pages/Home.ts", "import { u } from \"./utils\";\n");

    service(&workspace)
        .move_paths(&sources(&["src/pages/utils.ts"]), "src/helpers/utils.ts", &apply())
        .await
        .unwrap();

    assert_eq!(
        workspace.read_file("src/pages/Home.ts"),
        "import { u } from \"../helpers/utils\";\n"
    );
}

#[tokio::test]
async fn moved_file_rewrites_its_own_relative_imports() {
    let workspace = TestWorkspace::with_repository_boundary();
    workspace.create_file("src/config.ts", "export const cfg = {}\n");
    workspace.create_file(
        "src/services/api.ts",
        "import { cfg } from '../config'\nexport const api = () => import('./client')\n",
    );
    workspace.create_file("src/services/client.ts", "export {}\n");

    service(&workspace)
        .move_paths(&sources(&["src/services/api.ts"]), "src/core/http/", &apply())
        .await
        .unwrap();

    assert_eq!(
        workspace.read_file("src/core/http/api.ts"),
        "import { cfg } from '../../config'\nexport const api = () => import('../../services/client')\n"
    );
}

#[tokio::test]
async fn directory_move_updates_outside_importers_and_keeps_internal_imports() {
    let workspace = TestWorkspace::with_repository_boundary();
    workspace.create_file("src/store/index.ts", "export * from './modules/user'\n");
    workspace.create_file("src/store/modules/user.ts", "export const user = {}\n");
    workspace.create_file(
        "src/main.ts",
        "import store from './store'\nconst { user } = require('./store/modules/user')\n",
    );

    let report = service(&workspace)
        .move_paths(&sources(&["src/store"]), "web/state", &apply())
        .await
        .unwrap();

    assert_eq!(
        workspace.read_file("src/main.ts"),
        "import store from '../web/state'\nconst { user } = require('../web/state/modules/user')\n"
    );
    assert_eq!(
        workspace.read_file("web/state/index.ts"),
        "export * from './modules/user'\n"
    );
    assert!(report.items[0].is_directory);
    assert_eq!(report.files_updated, 1);
}

#[tokio::test]
async fn directory_to_directory_shaped_destination_is_placed_inside() {
    let workspace = TestWorkspace::with_repository_boundary();
    workspace.create_file("src/components/Button.vue", "<template><button /></template>\n");
    workspace.create_file(
        "src/main.ts",
        "import Button from './components/Button.vue'\n",
    );

    let report = service(&workspace)
        .move_paths(&sources(&["src/components"]), "src/ui", &MoveOptions { dry_run: true })
        .await
        .unwrap();

    assert_eq!(
        report.items[0].destination,
        workspace.absolute_path("src/ui/components")
    );
    assert_eq!(
        report.items[0].edits[0].changes[0].to,
        "./ui/components/Button.vue"
    );
}

#[tokio::test]
async fn directory_onto_existing_destination_merges() {
    let workspace = TestWorkspace::with_repository_boundary();
    workspace.create_file("src/a/x.ts", "export const x = 1\n");
    workspace.create_file("src/b/a/y.ts", "export const y = 2\n");
    workspace.create_file("src/main.ts", "import { x } from './a/x'\n");

    service(&workspace)
        .move_paths(&sources(&["src/a"]), "src/b", &apply())
        .await
        .unwrap();

    assert!(!workspace.file_exists("src/a"));
    assert!(workspace.file_exists("src/b/a/x.ts"));
    assert!(workspace.file_exists("src/b/a/y.ts"));
    assert_eq!(workspace.read_file("src/main.ts"), "import { x } from './b/a/x'\n");
}

#[tokio::test]
async fn glob_fan_out_handles_files_importing_each_other() {
    let workspace = TestWorkspace::with_repository_boundary();
    workspace.create_file("src/services/auth.ts", "import { http } from './http'\nexport const auth = 1\n");
    workspace.create_file("src/services/http.ts", "import { auth } from './auth'\nexport const http = 2\n");
    workspace.create_file("src/services/README.md", "services\n");
    workspace.create_file(
        "src/main.ts",
        "import { auth } from './services/auth'\nimport { http } from './services/http'\n",
    );

    let report = service(&workspace)
        .move_paths(&sources(&["src/services/*.ts"]), "src/core", &apply())
        .await
        .unwrap();

    assert_eq!(report.items.len(), 2);
    assert_eq!(report.items_failed, 0);
    assert_eq!(
        workspace.read_file("src/core/auth.ts"),
        "import { http } from './http'\nexport const auth = 1\n"
    );
    assert_eq!(
        workspace.read_file("src/core/http.ts"),
        "import { auth } from './auth'\nexport const http = 2\n"
    );
    assert_eq!(
        workspace.read_file("src/main.ts"),
        "import { auth } from './core/auth'\nimport { http } from './core/http'\n"
    );
    assert!(workspace.file_exists("src/services/README.md"));
}

#[tokio::test]
async fn glob_matching_nothing_is_reported_not_an_error() {
    let workspace = TestWorkspace::with_repository_boundary();
    workspace.create_file("src/main.ts", "");

    let report = service(&workspace)
        .move_paths(&sources(&["src/nothing/*.ts"]), "src/core", &apply())
        .await
        .unwrap();

    assert!(report.items.is_empty());
    assert_eq!(report.unmatched_patterns, vec!["src/nothing/*.ts".to_string()]);
}

#[tokio::test]
async fn missing_literal_source_is_fatal() {
    let workspace = TestWorkspace::with_repository_boundary();

    let err = service(&workspace)
        .move_paths(&sources(&["src/missing.ts"]), "src/lib", &apply())
        .await
        .unwrap_err();

    assert!(matches!(err, RehomeError::SourceNotFound { .. }));
}

#[tokio::test]
async fn circular_config_aborts_literal_move_before_mutation() {
    let workspace = TestWorkspace::with_repository_boundary();
    workspace.create_file("tsconfig.json", r#"{ "extends": "./tsconfig.base.json" }"#);
    workspace.create_file("tsconfig.base.json", r#"{ "extends": "./tsconfig.json" }"#);
    workspace.create_file("src/a.ts", "");

    let err = service(&workspace)
        .move_paths(&sources(&["src/a.ts"]), "src/lib/a.ts", &apply())
        .await
        .unwrap_err();

    assert!(matches!(err, RehomeError::Config(ref e) if e.is_circular()));
    assert!(workspace.file_exists("src/a.ts"));
}

#[tokio::test]
async fn dry_run_reports_without_touching_disk() {
    let workspace = TestWorkspace::with_repository_boundary();
    workspace.create_file("src/a.ts", "export const a = 1\n");
    workspace.create_file("src/main.ts", "import { a } from './a'\n");

    let report = service(&workspace)
        .move_paths(&sources(&["src/a.ts"]), "src/lib/", &MoveOptions { dry_run: true })
        .await
        .unwrap();

    assert!(report.dry_run);
    assert!(!report.items[0].moved);
    assert_eq!(report.items[0].destination, workspace.absolute_path("src/lib/a.ts"));
    assert_eq!(report.imports_updated, 1);
    assert_eq!(report.items[0].edits[0].changes[0].to, "./lib/a");

    assert_eq!(workspace.read_file("src/main.ts"), "import { a } from './a'\n");
    assert!(workspace.file_exists("src/a.ts"));
    assert!(!workspace.file_exists("src/lib"));
}

#[tokio::test]
async fn second_pass_on_consistent_project_yields_no_edits() {
    let workspace = TestWorkspace::with_repository_boundary();
    workspace.create_tsconfig_with_paths(&[("@/*", "src/*")]);
    workspace.create_file("src/utils/format.ts", "export const f = 1\n");
    workspace.create_file(
        "src/main.ts",
        "import { f } from '@/utils/format'\nimport { g } from './utils/format'\n",
    );

    let service = service(&workspace);
    let first = service
        .move_paths(&sources(&["src/utils"]), "src/lib", &apply())
        .await
        .unwrap();
    assert_eq!(first.imports_updated, 2);
    assert_eq!(
        workspace.read_file("src/main.ts"),
        "import { f } from '@/lib/utils/format'\nimport { g } from './lib/utils/format'\n"
    );

    // No move pending: every file stays where it is
    let files = list_project_files(&DiscoveryOptions::from_config(
        workspace.path(),
        &AppConfig::default(),
    ))
    .await
    .unwrap();
    for file in &files {
        let spec = MoveSpec::new(&file.absolute_path, &file.absolute_path, false);
        let flagged = analyze(&files, &spec, service.resolver());
        let planned = rewrite(&flagged, &spec, service.resolver());
        assert!(
            planned.is_empty(),
            "unexpected edits for {}",
            file.relative_path.display()
        );
    }
}

#[tokio::test]
async fn glob_skips_the_destination_directory_it_matches() {
    let workspace = TestWorkspace::with_repository_boundary();
    workspace.create_file("src/core/x.ts", "export const x = 1\n");
    workspace.create_file("src/util.ts", "export const u = 1\n");
    workspace.create_file(
        "main.ts",
        "import { x } from './src/core/x'\nimport { u } from './src/util'\n",
    );

    let report = service(&workspace)
        .move_paths(&sources(&["src/*"]), "src/core", &apply())
        .await
        .unwrap();

    assert_eq!(report.items.len(), 1);
    assert_eq!(report.items_failed, 0);
    assert_eq!(
        workspace.read_file("main.ts"),
        "import { x } from './src/core/x'\nimport { u } from './src/core/util'\n"
    );
    assert!(workspace.file_exists("src/core/x.ts"));
    assert!(workspace.file_exists("src/core/util.ts"));
}

#[tokio::test]
async fn moving_directory_into_itself_fails_before_rewriting() {
    let workspace = TestWorkspace::with_repository_boundary();
    workspace.create_file("src/core/x.ts", "export const x = 1\n");
    workspace.create_file("main.ts", "import { x } from './src/core/x'\n");

    let err = service(&workspace)
        .move_paths(&sources(&["src"]), "src/core", &apply())
        .await
        .unwrap_err();

    assert!(matches!(err, RehomeError::DestinationInsideSource { .. }));
    assert_eq!(workspace.read_file("main.ts"), "import { x } from './src/core/x'\n");
    assert!(workspace.file_exists("src/core/x.ts"));
}
