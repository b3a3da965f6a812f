// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use rand::distr::Alphanumeric;
use rand::Rng;

/// 任务ID长度
pub const ID_LENGTH: usize = 8;

/// 任务ID生成器特质
///
/// 生成器本身不保证唯一性，由注册表在插入时检查冲突。
pub trait IdGenerator: Send + Sync {
    fn generate(&self) -> String;
}

/// 基于密码学安全随机源的ID生成器
///
/// 从 `[0-9A-Za-z]` 中均匀抽取 [`ID_LENGTH`] 个字符。
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomIdGenerator;

impl IdGenerator for RandomIdGenerator {
    fn generate(&self) -> String {
        // ThreadRng is a CSPRNG periodically reseeded from the OS
        rand::rng()
            .sample_iter(&Alphanumeric)
            .take(ID_LENGTH)
            .map(char::from)
            .collect()
    }
}
