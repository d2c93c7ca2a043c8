//! Built-in split plans for the kernel resource test suite.
//!
//! Two oversized test files under `packages/kernel/src/resource/__tests__`
//! are split into one file per `describe` topic. The line numbers below were
//! read off the generated files by hand; they are not derived from the
//! sources and nothing checks them against the files at run time beyond the
//! warnings produced by [`crate::validate`].

use std::path::PathBuf;

use crate::error::{Result, SplitterError};
use crate::template::HeaderTemplate;
use crate::types::{ConflictPolicy, SplitDescriptor, SplitPlan};

/// Name of the store test plan.
pub const STORE_PLAN: &str = "store";

/// Name of the cache test plan.
pub const CACHE_PLAN: &str = "cache";

const STORE_SOURCE: &str = "packages/kernel/src/resource/__tests__/store.test.ts";
const STORE_OUT_DIR: &str = "packages/kernel/src/resource/__tests__/store";

const CACHE_SOURCE: &str = "packages/kernel/src/resource/__tests__/cache.test.ts";
const CACHE_OUT_DIR: &str = "packages/kernel/src/resource/__tests__/cache";

/// Closes the `describe` block opened by the store header.
const STORE_FOOTER: &str = "\n});\n";

/// (filename, title, start, end)
const STORE_SPLITS: [(&str, &str, usize, usize); 5] = [
    ("selectors.test.ts", "Selectors", 441, 573),
    ("resolvers.test.ts", "Resolvers", 574, 718),
    ("cache-keys.test.ts", "Cache Keys", 719, 776),
    ("thin-flat-api.test.ts", "Thin-Flat API", 777, 1102),
    ("grouped-api.test.ts", "Grouped API", 1103, 1503),
];

const CACHE_SPLITS: [(&str, &str, usize, usize); 5] = [
    ("keys.test.ts", "Cache Keys", 18, 263),
    ("interpolation.test.ts", "Interpolation", 264, 487),
    ("invalidate.test.ts", "Invalidate", 488, 835),
    ("invalidate-all.test.ts", "Invalidate All", 836, 935),
    ("edge-cases.test.ts", "Edge Cases", 936, 1199),
];

const STORE_HEADER: &str = r#"/**
 * Unit tests for createStore factory - {title}
 *
 * Tests the @wordpress/data store integration
 */

import {{ createStore }} from '../../store.js';
import type {{ ResourceObject, ListResponse }} from '../../types.js';
import {{ KernelError }} from '../../../error/index.js';

// Mock resource for testing
interface MockThing {{
	id: number;
	title: string;
	status: string;
}}

interface MockThingQuery {{
	q?: string;
	status?: string;
}}

describe('createStore - {title}', () => {{
	let mockResource: ResourceObject<MockThing, MockThingQuery>;
	let mockListResponse: ListResponse<MockThing>;

	beforeEach(() => {{
		mockListResponse = {{
			items: [
				{{ id: 1, title: 'Thing One', status: 'active' }},
				{{ id: 2, title: 'Thing Two', status: 'inactive' }},
			],
			total: 2,
			hasMore: false,
		}};

		mockResource = {{
			name: 'thing',
			storeKey: 'wpk/thing',
			cacheKeys: {{
				list: (query) => ['thing', 'list', JSON.stringify(query || {{}})],
				get: (id) => ['thing', 'get', id],
				create: (data) => [
					'thing',
					'create',
					JSON.stringify(data || {{}}),
				],
				update: (id) => ['thing', 'update', id],
				remove: (id) => ['thing', 'remove', id],
			}},
			routes: {{
				list: {{ path: '/wpk/v1/things', method: 'GET' }},
				get: {{ path: '/wpk/v1/things/:id', method: 'GET' }},
				create: {{ path: '/wpk/v1/things', method: 'POST' }},
				update: {{ path: '/wpk/v1/things/:id', method: 'PUT' }},
				remove: {{ path: '/wpk/v1/things/:id', method: 'DELETE' }},
			}},
			fetchList: jest.fn().mockResolvedValue(mockListResponse),
			fetch: jest.fn().mockResolvedValue({{
				id: 1,
				title: 'Thing One',
				status: 'active',
			}}),
			create: jest.fn().mockResolvedValue({{
				id: 3,
				title: 'New Thing',
				status: 'active',
			}}),
			update: jest.fn().mockResolvedValue({{
				id: 1,
				title: 'Updated Thing',
				status: 'active',
			}}),
			remove: jest.fn().mockResolvedValue(undefined),
			// Thin-flat API methods
			useGet: jest.fn(),
			useList: jest.fn(),
			prefetchGet: jest.fn().mockResolvedValue(undefined),
			prefetchList: jest.fn().mockResolvedValue(undefined),
			invalidate: jest.fn(),
			key: jest.fn(
				(
					operation: 'list' | 'get' | 'create' | 'update' | 'remove',
					params?: any
				): (string | number | boolean)[] => {{
					const generators = mockResource.cacheKeys;
					const result = generators[operation]?.(params as any) || [];
					return result.filter(
						(v): v is string | number | boolean =>
							v !== null && v !== undefined
					);
				}}
			),
			store: {{}},
			// Grouped API namespaces
			select: {{
				item: jest.fn().mockReturnValue(undefined),
				items: jest.fn().mockReturnValue([]),
				list: jest.fn().mockReturnValue([]),
			}},
			use: {{
				item: jest.fn(),
				list: jest.fn(),
			}},
			get: {{
				item: jest.fn().mockResolvedValue({{
					id: 1,
					title: 'Thing One',
					status: 'active',
				}}),
				list: jest.fn().mockResolvedValue(mockListResponse),
			}},
			mutate: {{
				create: jest.fn().mockResolvedValue({{
					id: 3,
					title: 'New Thing',
					status: 'active',
				}}),
				update: jest.fn().mockResolvedValue({{
					id: 1,
					title: 'Updated Thing',
					status: 'active',
				}}),
				remove: jest.fn().mockResolvedValue(undefined),
			}},
			cache: {{
				prefetch: {{
					item: jest.fn().mockResolvedValue(undefined),
					list: jest.fn().mockResolvedValue(undefined),
				}},
				invalidate: {{
					item: jest.fn(),
					list: jest.fn(),
					all: jest.fn(),
				}},
				key: jest.fn(),
			}},
			storeApi: {{
				key: 'wpk/thing',
				descriptor: {{}},
			}},
			events: {{
				created: 'wpk.thing.created',
				updated: 'wpk.thing.updated',
				removed: 'wpk.thing.removed',
			}},
		}};
	}});

"#;

const CACHE_HEADER: &str = r#"/**
 * @file Cache Utilities Tests - {title}
 * Consolidated tests for cache keys, interpolation, and invalidation
 */

import {{
	normalizeCacheKey,
	matchesCacheKey,
	findMatchingKeys,
	findMatchingKeysMultiple,
	interpolatePath,
	extractPathParams,
	invalidate,
	invalidateAll,
	registerStoreKey,
	type CacheKeyPattern,
}} from '../../cache.js';
import {{ KernelError }} from '../../../error/index.js';

// Mock window.wp global
interface WindowWithWp extends Window {{
	wp?: {{
		data?: {{
			dispatch: jest.Mock;
			select: jest.Mock;
		}};
		hooks?: {{
			doAction: jest.Mock;
		}};
	}};
}}

"#;

fn descriptors(table: &[(&str, &str, usize, usize)]) -> Vec<SplitDescriptor> {
    table
        .iter()
        .map(|&(filename, title, start, end)| SplitDescriptor::new(filename, title, start, end))
        .collect()
}

/// Plan splitting `store.test.ts`.
///
/// Existing outputs are skipped, and each body is followed by `});` to
/// close the `describe` block the header opens.
#[must_use]
pub fn store_plan() -> SplitPlan {
    SplitPlan {
        name: STORE_PLAN.to_string(),
        heading: "Store Tests".to_string(),
        source: PathBuf::from(STORE_SOURCE),
        out_dir: PathBuf::from(STORE_OUT_DIR),
        header: HeaderTemplate::new(STORE_HEADER),
        footer: Some(STORE_FOOTER.to_string()),
        on_conflict: ConflictPolicy::Skip,
        splits: descriptors(&STORE_SPLITS),
    }
}

/// Plan splitting `cache.test.ts`.
///
/// Outputs are always overwritten. The copied ranges contain whole
/// top-level `describe` blocks, so no footer is needed.
#[must_use]
pub fn cache_plan() -> SplitPlan {
    SplitPlan {
        name: CACHE_PLAN.to_string(),
        heading: "Cache Tests".to_string(),
        source: PathBuf::from(CACHE_SOURCE),
        out_dir: PathBuf::from(CACHE_OUT_DIR),
        header: HeaderTemplate::new(CACHE_HEADER),
        footer: None,
        on_conflict: ConflictPolicy::Overwrite,
        splits: descriptors(&CACHE_SPLITS),
    }
}

/// All built-in plans, in run order.
#[must_use]
pub fn builtin_plans() -> Vec<SplitPlan> {
    vec![store_plan(), cache_plan()]
}

/// Keep only the plans named in `only`, in their original order.
///
/// An empty filter keeps everything. Unknown names are an error.
pub fn select_plans(plans: Vec<SplitPlan>, only: &[String]) -> Result<Vec<SplitPlan>> {
    if only.is_empty() {
        return Ok(plans);
    }

    for name in only {
        if !plans.iter().any(|p| &p.name == name) {
            return Err(SplitterError::UnknownPlan {
                name: name.clone(),
                available: plans.iter().map(|p| p.name.clone()).collect(),
            });
        }
    }

    Ok(plans.into_iter().filter(|p| only.contains(&p.name)).collect())
}
