use crate::calendar::aggregator::CalendarAggregator;
use crate::sync::api::{ApiError, DashboardApi};
use crate::sync::scope::{Cancelled, RequestScope};

fn or_empty<T>(source: &str, result: Result<Vec<T>, ApiError>) -> Vec<T> {
    result.unwrap_or_else(|e| {
        tracing::warn!("Calendar source {} unavailable, showing none: {}", source, e);
        Vec::new()
    })
}

/// Fetches projects, tasks and custom events concurrently and feeds each into
/// `aggregator`. A failing source contributes nothing and does not affect the
/// other two. If `scope` is cancelled before all three resolve, the
/// aggregator is left untouched.
pub async fn refresh_calendar<A>(
    api: &A,
    aggregator: &mut CalendarAggregator,
    scope: &RequestScope,
) -> Result<(), Cancelled>
where
    A: DashboardApi + ?Sized,
{
    let (projects, tasks, custom) = scope
        .run(async {
            tokio::join!(api.list_projects(), api.list_tasks(), api.list_custom_events())
        })
        .await?;

    aggregator.set_projects(&or_empty("projects", projects));
    aggregator.set_tasks(&or_empty("tasks", tasks));
    aggregator.set_custom_events(&or_empty("custom-events", custom));

    tracing::info!("Calendar refreshed with {} events", aggregator.events().len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::adapters::AdapterDefaults;
    use crate::model::{CustomEventRecord, Project, Task, TaskStatus};
    use crate::sync::api::MockDashboardApi;
    use chrono::NaiveDate;

    fn project() -> Project {
        Project {
            id: 1.into(),
            name: "Launch".to_string(),
            description: None,
            status: None,
            due_date: Some("2024-03-01".to_string()),
            progress: 0,
        }
    }

    fn task() -> Task {
        Task {
            id: 1.into(),
            title: "Write notes".to_string(),
            description: None,
            status: TaskStatus::Todo,
            priority: Default::default(),
            progress: 0,
            assignee: None,
            due_date: Some("2024-03-01".to_string()),
            project_id: None,
        }
    }

    fn custom() -> CustomEventRecord {
        CustomEventRecord {
            id: "evt-1".into(),
            title: "Standup".to_string(),
            date: Some("2024-03-01".to_string()),
            time: Some("09:15".to_string()),
            kind: Some("meeting".to_string()),
            color: None,
            description: None,
        }
    }

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
    }

    #[tokio::test]
    async fn all_sources_land_in_one_day_bucket() {
        let mut api = MockDashboardApi::new();
        api.expect_list_projects().returning(|| Ok(vec![project()]));
        api.expect_list_tasks().returning(|| Ok(vec![task()]));
        api.expect_list_custom_events().returning(|| Ok(vec![custom()]));

        let mut aggregator = CalendarAggregator::new(AdapterDefaults::default());
        refresh_calendar(&api, &mut aggregator, &RequestScope::new())
            .await
            .unwrap();

        let ids: Vec<&str> = aggregator.events_for_day(day()).iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["project-1", "task-1", "evt-1"]);
    }

    #[tokio::test]
    async fn failed_source_is_empty_and_others_still_render() {
        let mut api = MockDashboardApi::new();
        api.expect_list_projects().returning(|| Ok(vec![project()]));
        api.expect_list_tasks()
            .returning(|| Err(ApiError::RequestError("Status 502: bad gateway".to_string())));
        api.expect_list_custom_events().returning(|| Ok(vec![custom()]));

        let mut aggregator = CalendarAggregator::new(AdapterDefaults::default());
        refresh_calendar(&api, &mut aggregator, &RequestScope::new())
            .await
            .unwrap();

        let ids: Vec<&str> = aggregator.events().iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["project-1", "evt-1"]);
    }

    #[tokio::test]
    async fn cancelled_scope_leaves_aggregator_untouched() {
        let mut api = MockDashboardApi::new();
        api.expect_list_projects().returning(|| Ok(vec![project()]));
        api.expect_list_tasks().returning(|| Ok(vec![task()]));
        api.expect_list_custom_events().returning(|| Ok(vec![custom()]));

        let scope = RequestScope::new();
        scope.cancel();
        let mut aggregator = CalendarAggregator::new(AdapterDefaults::default());

        let result = refresh_calendar(&api, &mut aggregator, &scope).await;

        assert_eq!(result, Err(Cancelled));
        assert!(aggregator.events().is_empty());
    }
}
