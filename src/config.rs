use serde::{Deserialize, Serialize};

///
/// Tunable parameters of the factorization.
///
/// None of them influences the result (the factorization is unique), only how many
/// candidates are tried before the algorithm commits to one. Since the evaluation points
/// for multivariate polynomials are chosen randomly, the seed is part of the configuration,
/// which makes each run reproducible.
///
/// # Example
/// ```
/// # use feanor_factor::config::*;
/// let config: FactorConfig = serde_json::from_str(r#"{ "prime_trials": 5 }"#).unwrap();
/// assert_eq!(5, config.prime_trials);
/// assert_eq!(FactorConfig::default().evaluation_trials, config.evaluation_trials);
/// ```
///
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FactorConfig {
    /// number of usable primes for which a univariate polynomial is factored modulo `p`;
    /// the prime with fewest modular factors is used for lifting
    pub prime_trials: usize,
    /// primes are searched up to this bound, afterwards the factorization fails
    pub max_prime: u64,
    /// how often the minimal number of univariate factors must be observed before a set of
    /// evaluation points is accepted
    pub evaluation_trials: usize,
    /// evaluation points are chosen in `(-m, m]`, and `m` starts at this value
    pub initial_evaluation_bound: u64,
    /// the number of failed attempts after which the factorization gives up, or `None`
    pub max_evaluation_attempts: Option<usize>,
    pub seed: u64
}

impl Default for FactorConfig {

    fn default() -> Self {
        FactorConfig {
            prime_trials: 3,
            max_prime: 1 << 20,
            evaluation_trials: 3,
            initial_evaluation_bound: 3,
            max_evaluation_attempts: None,
            seed: 0x5f3e_1b27_9a40_c6d2
        }
    }
}

#[test]
fn test_serialize_round_trip() {
    let config = FactorConfig { seed: 42, max_evaluation_attempts: Some(100), ..FactorConfig::default() };
    let json = serde_json::to_string(&config).unwrap();
    assert_eq!(config, serde_json::from_str::<FactorConfig>(&json).unwrap());
}

#[test]
fn test_missing_fields_use_default() {
    let config: FactorConfig = serde_json::from_str("{}").unwrap();
    assert_eq!(FactorConfig::default(), config);
}
