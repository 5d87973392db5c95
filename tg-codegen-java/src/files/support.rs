//! Fixed repository support classes.

use tablegen_core::{GeneratedFile, Overwrite};

use crate::java_file::JavaFile;

/// Thrown when an update or delete matches no row for the id and the
/// previous updated-at.
pub struct OptimisticLockExceptionJava;

impl GeneratedFile for OptimisticLockExceptionJava {
    fn path(&self) -> String {
        "repository/OptimisticLockingFailureException.java".to_string()
    }

    fn render(&self) -> String {
        JavaFile::new("repository").render(|b| {
            b.push_doc_block(["Thrown when a row changed since it was read"]);
            b.push_block(
                "public class OptimisticLockingFailureException extends RuntimeException {",
                "}",
                |b| {
                    b.push_block(
                        "public OptimisticLockingFailureException(String message) {",
                        "}",
                        |b| {
                            b.push_line("super(message);");
                        },
                    );
                },
            );
        })
    }
}

/// Dispatcher the repositories run their queries on.
///
/// Only written when missing: applications commonly tune it.
pub struct DatabaseExecutionContextJava;

impl GeneratedFile for DatabaseExecutionContextJava {
    fn path(&self) -> String {
        "repository/DatabaseExecutionContext.java".to_string()
    }

    fn overwrite(&self) -> Overwrite {
        Overwrite::IfMissing
    }

    fn render(&self) -> String {
        JavaFile::new("repository")
            .imports([
                "akka.actor.ActorSystem",
                "javax.inject.Inject",
                "play.libs.concurrent.CustomExecutionContext",
            ])
            .render(|b| {
                b.push_doc_block(["Execution context for blocking database calls"]);
                b.push_block(
                    "public class DatabaseExecutionContext extends CustomExecutionContext {",
                    "}",
                    |b| {
                        b.push_line("@Inject");
                        b.push_block(
                            "public DatabaseExecutionContext(ActorSystem actorSystem) {",
                            "}",
                            |b| {
                                b.push_line("super(actorSystem, \"database.dispatcher\");");
                            },
                        );
                    },
                );
            })
    }
}
