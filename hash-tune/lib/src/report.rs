//! Renders recommendations as `crypto { ... }` configuration blocks.
//!
//! ```text
//! crypto {
//! 	/* Target: 0.300000s; Benchmarked: 0.300000s */
//! 	argon2_type = "argon2id";
//! 	argon2_memcost = 20; /* 1048576 KiB */
//! 	argon2_timecost = 6;
//! 	argon2_threads = 1;
//! };
//! ```

use std::fmt;

use crate::params::CostParameters;
use crate::tuner::{Recommendation, TuneReport};

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "crypto {{")?;
        writeln!(
            f,
            "\t/* Target: {:.6}s; Benchmarked: {:.6}s */",
            self.target.as_secs_f64(),
            self.elapsed.as_secs_f64()
        )?;
        if !self.met_target {
            writeln!(f, "\t/* Target not met: reached minimum cost */")?;
        }

        match &self.parameters {
            CostParameters::Argon2(cost) => {
                writeln!(f, "\targon2_type = \"argon2id\";")?;
                writeln!(
                    f,
                    "\targon2_memcost = {}; /* {} KiB */",
                    cost.memory_exponent,
                    cost.memory_kib()
                )?;
                writeln!(f, "\targon2_timecost = {};", cost.time_cost)?;
                writeln!(f, "\targon2_threads = {};", cost.threads)?;
            }
            CostParameters::Scrypt(cost) => {
                writeln!(
                    f,
                    "\tscrypt_memlimit = {}; /* {} KiB */",
                    cost.memory_exponent,
                    cost.memory_kib()
                )?;
                writeln!(f, "\tscrypt_opslimit = {};", cost.operation_limit)?;
            }
            CostParameters::Pbkdf2(cost) => {
                writeln!(f, "\tpbkdf2v2_digest = \"{}\";", cost.digest)?;
                writeln!(f, "\tpbkdf2v2_rounds = {};", cost.iterations)?;
            }
        }

        write!(f, "}};")
    }
}

impl fmt::Display for TuneReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, recommendation) in self.recommendations.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            writeln!(f, "{recommendation}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::params::{Argon2Cost, Family, Pbkdf2Cost, Pbkdf2Digest, ScryptCost};

    fn recommendation(parameters: CostParameters, met_target: bool) -> Recommendation {
        Recommendation {
            family: parameters.family(),
            parameters,
            elapsed: Duration::from_millis(300),
            target: Duration::from_millis(300),
            met_target,
        }
    }

    #[test]
    fn renders_argon2_block() {
        let rendered = recommendation(
            Argon2Cost {
                memory_exponent: 20,
                time_cost: 6,
                threads: 1,
            }
            .into(),
            true,
        )
        .to_string();

        assert_eq!(
            rendered,
            "crypto {\n\
             \t/* Target: 0.300000s; Benchmarked: 0.300000s */\n\
             \targon2_type = \"argon2id\";\n\
             \targon2_memcost = 20; /* 1048576 KiB */\n\
             \targon2_timecost = 6;\n\
             \targon2_threads = 1;\n\
             };"
        );
    }

    #[test]
    fn renders_scrypt_block() {
        let rendered = recommendation(ScryptCost::for_memory(16).into(), true).to_string();
        assert!(rendered.contains("\tscrypt_memlimit = 16; /* 65536 KiB */\n"));
        assert!(rendered.contains("\tscrypt_opslimit = 2097152;\n"));
    }

    #[test]
    fn renders_pbkdf2_block() {
        let rendered = recommendation(
            Pbkdf2Cost {
                digest: Pbkdf2Digest::Sha512,
                iterations: 64000,
            }
            .into(),
            true,
        )
        .to_string();
        assert!(rendered.contains("\tpbkdf2v2_digest = \"SHA512\";\n"));
        assert!(rendered.contains("\tpbkdf2v2_rounds = 64000;\n"));
    }

    #[test]
    fn soft_stopped_block_is_flagged() {
        let rendered = recommendation(
            Pbkdf2Cost {
                digest: Pbkdf2Digest::Sha256,
                iterations: 10000,
            }
            .into(),
            false,
        )
        .to_string();
        assert!(rendered.contains("Target not met"));
    }

    #[test]
    fn report_separates_blocks() {
        let report = TuneReport {
            target: Duration::from_millis(300),
            recommendations: vec![
                recommendation(ScryptCost::for_memory(14).into(), true),
                recommendation(
                    Pbkdf2Cost {
                        digest: Pbkdf2Digest::Sha256,
                        iterations: 10000,
                    }
                    .into(),
                    true,
                ),
            ],
            warnings: Vec::new(),
        };
        let rendered = report.to_string();
        assert_eq!(rendered.matches("crypto {").count(), 2);
        assert!(rendered.contains("};\n\ncrypto {"));
        assert_eq!(report.recommendations[0].family, Family::Scrypt);
    }
}
