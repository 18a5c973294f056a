use appraisal_application::{
    ActorSummary, CategoryTotals, LoginBreakdown, LoginStatistics, LoginStatisticsQuery,
    OperationQuery, OperationReport, OperationView, UserLoginSummary,
};
use appraisal_core::AppError;
use appraisal_domain::{EntityKind, OperationKind, UserId};
use chrono::SecondsFormat;

use super::types::{
    ActorResponse, ChartDataResponse, ChartDatasetsResponse, DesignationTotalsResponse,
    EntityKindTotalsResponse, HourlyDataResponse, HourlySeriesResponse, LoginStatisticsParams,
    LoginStatisticsResponse, OperationRecordResponse, OperationsStatisticsParams,
    OperationsStatisticsResponse, UserLoginResponse,
};

impl From<LoginStatisticsParams> for LoginStatisticsQuery {
    fn from(value: LoginStatisticsParams) -> Self {
        Self {
            date: non_blank(value.date),
            designation: non_blank(value.designation),
            hourly: value
                .hourly
                .as_deref()
                .map(str::trim)
                .is_some_and(|flag| flag.eq_ignore_ascii_case("true") || flag == "1"),
        }
    }
}

impl TryFrom<OperationsStatisticsParams> for OperationQuery {
    type Error = AppError;

    fn try_from(value: OperationsStatisticsParams) -> Result<Self, Self::Error> {
        Ok(Self {
            date: non_blank(value.date),
            actor: non_blank(value.user_id)
                .map(|user_id| UserId::parse(&user_id))
                .transpose()?,
            operation_kind: non_blank(value.operation)
                .map(|operation| operation.parse::<OperationKind>())
                .transpose()?,
            entity_kind: non_blank(value.model_name)
                .map(|model_name| model_name.parse::<EntityKind>())
                .transpose()?,
        })
    }
}

impl From<LoginStatistics> for LoginStatisticsResponse {
    fn from(value: LoginStatistics) -> Self {
        let (by_designation, chart_data, hourly_data) = match value.breakdown {
            LoginBreakdown::ByDesignation(totals) => {
                let chart = ChartDataResponse {
                    labels: totals.iter().map(|item| item.category.clone()).collect(),
                    datasets: ChartDatasetsResponse {
                        counts: totals.iter().map(|item| item.count).collect(),
                        logins: totals.iter().map(|item| item.total).collect(),
                    },
                };
                let rows = totals
                    .into_iter()
                    .map(|item| DesignationTotalsResponse {
                        designation: item.category,
                        count: item.count,
                        total_logins: item.total,
                    })
                    .collect();
                (Some(rows), Some(chart), None)
            }
            LoginBreakdown::Hourly(matrix) => (
                None,
                None,
                Some(HourlyDataResponse {
                    labels: matrix.labels,
                    datasets: matrix
                        .series
                        .into_iter()
                        .map(|series| HourlySeriesResponse {
                            designation: series.category,
                            data: series.values,
                        })
                        .collect(),
                }),
            ),
        };

        Self {
            success: true,
            date: value.date.to_string(),
            total_logins: value.total_logins,
            total_count: value.total_count,
            by_designation,
            chart_data,
            hourly_data,
            users_data: value
                .users
                .map(|users| users.into_iter().map(UserLoginResponse::from).collect()),
        }
    }
}

impl From<UserLoginSummary> for UserLoginResponse {
    fn from(value: UserLoginSummary) -> Self {
        Self {
            user_id: value.user_id.to_string(),
            full_name: value.full_name,
            email: value.email,
            count: value.count,
            total_logins: value.total_logins,
            last_login: value
                .last_login
                .to_rfc3339_opts(SecondsFormat::Millis, false),
        }
    }
}

impl OperationsStatisticsResponse {
    /// Combines the grouped records with the per-entity-kind totals.
    pub fn from_report(value: OperationReport, activity: Vec<CategoryTotals>) -> Self {
        Self {
            success: true,
            date: value.date.to_string(),
            by_entity_kind: activity
                .into_iter()
                .map(|totals| EntityKindTotalsResponse {
                    model_name: totals.category,
                    count: totals.count,
                })
                .collect(),
            operations: value
                .operations
                .into_iter()
                .map(|(kind, views)| {
                    (
                        kind,
                        views.into_iter().map(OperationRecordResponse::from).collect(),
                    )
                })
                .collect(),
        }
    }
}

impl From<OperationView> for OperationRecordResponse {
    fn from(value: OperationView) -> Self {
        let record = value.record;
        Self {
            id: record.record_id.to_string(),
            actor: ActorResponse::from(value.actor),
            target_id: record.target_id.to_string(),
            model_name: record.entity_kind.as_storage(),
            operation: record.operation_kind.as_str().to_owned(),
            details: record.details,
            timestamp: record.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

impl From<ActorSummary> for ActorResponse {
    fn from(value: ActorSummary) -> Self {
        Self {
            id: value.id.map(|user_id| user_id.to_string()),
            full_name: value.full_name,
            email: value.email,
            designation: value.designation,
            department: value.department,
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}
