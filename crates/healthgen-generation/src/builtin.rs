//! Built-in health endpoint template set

use crate::{features::feature, registry::TemplateDescriptor};

macro_rules! template {
    ($file:literal) => {
        include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/templates/", $file)).as_bytes()
    };
}

/// Descriptors of the built-in template set, in registration order
pub(crate) fn descriptors() -> Vec<TemplateDescriptor> {
    vec![
        TemplateDescriptor::new("go-mod", "go.mod", template!("go.mod.tmpl")),
        TemplateDescriptor::new("readme", "README.md.tmpl", template!("README.md.tmpl")),
        TemplateDescriptor::new("gitignore", ".gitignore", template!("gitignore")),
        TemplateDescriptor::new("dockerfile", "Dockerfile", template!("Dockerfile.tmpl")),
        TemplateDescriptor::new(
            "docker-compose",
            "docker-compose.yml",
            template!("docker-compose.yml.tmpl"),
        ),
        TemplateDescriptor::new(
            "server-main",
            "cmd/server/main.go",
            template!("cmd/server/main.go.tmpl"),
        ),
        TemplateDescriptor::new(
            "server-config",
            "internal/config/config.go",
            template!("internal/config/config.go.tmpl"),
        ),
        TemplateDescriptor::new(
            "health-models",
            "internal/models/health.go",
            template!("internal/models/health.go.tmpl"),
        ),
        TemplateDescriptor::new(
            "health-handler",
            "internal/handlers/health.go",
            template!("internal/handlers/health.go.tmpl"),
        ),
        TemplateDescriptor::new(
            "dependencies-handler",
            "internal/handlers/dependencies.go",
            template!("internal/handlers/dependencies.go.tmpl"),
        )
        .requires(feature::DEPENDENCIES),
        TemplateDescriptor::new(
            "kubernetes-deployment",
            "deployments/kubernetes/deployment.yaml",
            template!("deployments/kubernetes/deployment.yaml.tmpl"),
        )
        .requires(feature::KUBERNETES),
        TemplateDescriptor::new(
            "kubernetes-service",
            "deployments/kubernetes/service.yaml",
            template!("deployments/kubernetes/service.yaml.tmpl"),
        )
        .requires(feature::KUBERNETES),
        TemplateDescriptor::new(
            "typescript-client",
            "client/typescript/src/client.ts",
            template!("client/typescript/src/client.ts.tmpl"),
        )
        .requires(feature::TYPESCRIPT),
        TemplateDescriptor::new(
            "typescript-package",
            "client/typescript/package.json",
            template!("client/typescript/package.json.tmpl"),
        )
        .requires(feature::TYPESCRIPT),
        TemplateDescriptor::new(
            "opentelemetry",
            "internal/observability/tracing.go",
            template!("internal/observability/tracing.go.tmpl"),
        )
        .requires(feature::OPENTELEMETRY),
        TemplateDescriptor::new(
            "cloudevents",
            "internal/events/emitter.go",
            template!("internal/events/emitter.go.tmpl"),
        )
        .requires(feature::CLOUDEVENTS),
        TemplateDescriptor::new(
            "mtls",
            "internal/security/mtls.go",
            template!("internal/security/mtls.go.tmpl"),
        )
        .requires(feature::MTLS),
        TemplateDescriptor::new(
            "rbac",
            "internal/security/rbac.go",
            template!("internal/security/rbac.go.tmpl"),
        )
        .requires(feature::RBAC),
        TemplateDescriptor::new(
            "audit",
            "internal/compliance/audit.go",
            template!("internal/compliance/audit.go.tmpl"),
        )
        .requires(feature::AUDIT),
        TemplateDescriptor::new(
            "compliance",
            "internal/compliance/report.go",
            template!("internal/compliance/report.go.tmpl"),
        )
        .requires(feature::COMPLIANCE),
    ]
}
