use ticket_core::{resolve_screen, NewFeature, NewTask, Route, Screen, Store, TicketService};

struct Fixture {
    service: TicketService,
    project: i64,
    feature: i64,
    other_project: i64,
}

async fn fixture() -> Fixture {
    let service = TicketService::new(Store::open_in_memory().await.unwrap());
    let project = service.add_project("Website", "").await.unwrap();
    let feature = service
        .add_feature(NewFeature::new(project, "Login", ""))
        .await
        .unwrap();
    service
        .add_task(NewTask::new(feature, "Form", ""))
        .await
        .unwrap();
    let other_project = service.add_project("Mobile", "").await.unwrap();

    Fixture {
        service,
        project,
        feature,
        other_project,
    }
}

async fn resolve(fixture: &Fixture, path: &str) -> Screen {
    resolve_screen(&fixture.service, &Route::parse(path))
        .await
        .unwrap()
}

#[tokio::test]
async fn full_path_resolves_to_task_view() {
    let fixture = fixture().await;
    let path = format!("/project/{}/feature/{}", fixture.project, fixture.feature);

    match resolve(&fixture, &path).await {
        Screen::Tasks {
            project,
            feature,
            tasks,
        } => {
            assert_eq!(project.id, fixture.project);
            assert_eq!(feature.id, fixture.feature);
            assert_eq!(tasks.len(), 1);
        }
        other => panic!("unexpected screen: {other:?}"),
    }
}

#[tokio::test]
async fn deleted_feature_falls_back_to_feature_list() {
    let fixture = fixture().await;
    fixture.service.delete_feature(fixture.feature).await.unwrap();
    let path = format!("/project/{}/feature/{}", fixture.project, fixture.feature);

    let screen = resolve(&fixture, &path).await;
    assert_eq!(screen.route(), Route::project(fixture.project));
    assert!(matches!(screen, Screen::Features { ref features, .. } if features.is_empty()));
}

#[tokio::test]
async fn feature_of_another_project_falls_back_to_feature_list() {
    let fixture = fixture().await;
    let path = format!(
        "/project/{}/feature/{}",
        fixture.other_project, fixture.feature
    );

    let screen = resolve(&fixture, &path).await;
    assert_eq!(screen.route(), Route::project(fixture.other_project));
}

#[tokio::test]
async fn deleted_project_falls_back_to_project_list() {
    let fixture = fixture().await;
    fixture.service.delete_project(fixture.project).await.unwrap();
    let path = format!("/project/{}/feature/{}", fixture.project, fixture.feature);

    match resolve(&fixture, &path).await {
        Screen::Projects { projects } => {
            assert_eq!(
                projects.iter().map(|project| project.id).collect::<Vec<_>>(),
                [fixture.other_project]
            );
        }
        other => panic!("unexpected screen: {other:?}"),
    }
}

#[tokio::test]
async fn legacy_feature_path_derives_its_project() {
    let fixture = fixture().await;
    let screen = resolve(&fixture, &format!("/feature/{}", fixture.feature)).await;

    assert_eq!(
        screen.route(),
        Route::feature(fixture.project, fixture.feature)
    );
    assert_eq!(
        screen.route().to_path(),
        format!("/project/{}/feature/{}", fixture.project, fixture.feature)
    );
}

#[tokio::test]
async fn unknown_paths_render_the_project_list() {
    let fixture = fixture().await;
    for path in ["/", "/nowhere", "/project/abc"] {
        let screen = resolve(&fixture, path).await;
        assert_eq!(screen.route(), Route::root(), "path `{path}`");
        assert!(matches!(screen, Screen::Projects { ref projects } if projects.len() == 2));
    }
}

#[tokio::test]
async fn screens_serialize_with_a_kind_tag() {
    let fixture = fixture().await;
    let screen = resolve(&fixture, &format!("/project/{}", fixture.project)).await;

    let json = serde_json::to_value(&screen).unwrap();
    assert_eq!(json["kind"], "features");
    assert_eq!(json["project"]["title"], "Website");
    assert_eq!(json["features"][0]["projectId"], fixture.project);
}
